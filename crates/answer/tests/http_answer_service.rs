//! Integration tests for HttpAnswerService against a mock answering service

use atelier_answer::{AnswerError, FailureKind, HttpAnswerService, ask};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// A well-formed answer is returned verbatim
#[tokio::test]
async fn test_posts_question_and_returns_markup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ask"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({ "question": "What is your pricing?" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "Our pricing is <b>$10/mo</b>."
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = HttpAnswerService::new(&mock_server.uri(), "/ask").expect("service");
    let answer = ask(&service, "What is your pricing?").await.expect("answer");

    assert_eq!(answer.markup, "Our pricing is <b>$10/mo</b>.");
}

/// Server errors surface as protocol failures carrying status and body
#[tokio::test]
async fn test_server_error_is_protocol_failure() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(500).set_body_string("ollama unreachable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = HttpAnswerService::new(&mock_server.uri(), "/ask").expect("service");
    let error = ask(&service, "hello").await.expect_err("500");

    assert_eq!(error.kind(), FailureKind::Protocol);
    match error {
        AnswerError::Status { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "ollama unreachable");
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// A success status with a body lacking `response` is still a failure
#[tokio::test]
async fn test_success_without_response_field_is_protocol_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "error": "no context" })),
        )
        .mount(&mock_server)
        .await;

    let service = HttpAnswerService::new(&mock_server.uri(), "/ask").expect("service");
    let error = ask(&service, "hello").await.expect_err("missing field");

    assert!(matches!(error, AnswerError::MissingAnswer { .. }));
    assert_eq!(error.kind(), FailureKind::Protocol);
}

/// A success status with an HTML body fails to decode
#[tokio::test]
async fn test_success_with_unparseable_body_is_protocol_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&mock_server)
        .await;

    let service = HttpAnswerService::new(&mock_server.uri(), "/ask").expect("service");
    let error = ask(&service, "hello").await.expect_err("html body");

    assert!(matches!(error, AnswerError::Decode { .. }));
}

/// Nothing listening on the endpoint is a transport failure
#[tokio::test]
async fn test_unreachable_service_is_transport_failure() {
    init_tracing();
    // Reserve a port, then release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let uri = format!("http://{}", listener.local_addr().expect("addr"));
    drop(listener);

    let service = HttpAnswerService::new(&uri, "/ask").expect("service");
    let error = ask(&service, "hello").await.expect_err("connection refused");

    assert_eq!(error.kind(), FailureKind::Transport);
}

/// Custom endpoint paths are honoured
#[tokio::test]
async fn test_custom_endpoint_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/ask"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "response": "ok" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = HttpAnswerService::new(&mock_server.uri(), "/api/v2/ask").expect("service");
    assert_eq!(service.endpoint().path(), "/api/v2/ask");

    let answer = ask(&service, "ping").await.expect("answer");
    assert_eq!(answer.markup, "ok");
}
