use futures::FutureExt;
use reqwest::{Client, Url};
use serde_json::Value;
use snafu::{OptionExt, ResultExt};

use super::provider::{
    Answer, AnswerResult, AnswerService, AskRequest, DecodeSnafu, InvalidEndpointSnafu,
    LocalBoxFuture, MissingAnswerSnafu, ReadBodySnafu, StatusSnafu, TransportSnafu,
};

pub const HTTP_ANSWER_SERVICE_ID: &str = "http";

/// Longest slice of an error body kept for diagnostics.
const MAX_LOGGED_BODY_CHARS: usize = 512;

/// JSON-over-HTTP answering service: `POST {"question"}` → `{"response"}`.
#[derive(Debug, Clone)]
pub struct HttpAnswerService {
    client: Client,
    endpoint: Url,
}

impl HttpAnswerService {
    /// Resolves `endpoint_path` against `base` (usually the page origin).
    pub fn new(base: &str, endpoint_path: &str) -> AnswerResult<Self> {
        let endpoint = resolve_endpoint(base, endpoint_path)?;
        Ok(Self::with_client(Client::new(), endpoint))
    }

    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn send(&self, request: AskRequest) -> AnswerResult<Answer> {
        tracing::debug!(endpoint = %self.endpoint, "sending ask request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .context(TransportSnafu {
                stage: "send-ask-request",
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => truncate_for_log(&body),
                Err(error) => format!("<unreadable body: {error}>"),
            };
            return StatusSnafu {
                stage: "ask-http-status",
                status: status.as_u16(),
                body,
            }
            .fail();
        }

        let body = response.text().await.context(ReadBodySnafu {
            stage: "read-ask-response",
        })?;
        parse_answer(&body)
    }
}

impl AnswerService for HttpAnswerService {
    fn id(&self) -> &str {
        HTTP_ANSWER_SERVICE_ID
    }

    fn ask<'a>(&'a self, request: AskRequest) -> LocalBoxFuture<'a, AnswerResult<Answer>> {
        self.send(request).boxed_local()
    }
}

pub fn resolve_endpoint(base: &str, endpoint_path: &str) -> AnswerResult<Url> {
    let joined = Url::parse(base).and_then(|base| base.join(endpoint_path));
    joined.map_err(|source| {
        InvalidEndpointSnafu {
            stage: "resolve-endpoint",
            endpoint: format!("{base}{endpoint_path}"),
            details: source.to_string(),
        }
        .build()
    })
}

/// Extracts the answer from a success body. Anything but an object with a
/// string `response` field is rejected.
pub fn parse_answer(body: &str) -> AnswerResult<Answer> {
    let value: Value = serde_json::from_str(body).context(DecodeSnafu {
        stage: "decode-answer",
    })?;

    let markup = value
        .as_object()
        .and_then(|object| object.get("response"))
        .and_then(Value::as_str)
        .context(MissingAnswerSnafu {
            stage: "extract-answer",
        })?;

    Ok(Answer::new(markup))
}

fn truncate_for_log(body: &str) -> String {
    if body.chars().count() <= MAX_LOGGED_BODY_CHARS {
        return body.to_string();
    }
    let mut truncated = body.chars().take(MAX_LOGGED_BODY_CHARS).collect::<String>();
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{AnswerError, FailureKind};

    #[test]
    fn parses_response_field() {
        let answer = parse_answer(r#"{"response": "Our pricing is <b>$10/mo</b>.", "sources": []}"#)
            .expect("answer");
        assert_eq!(answer.markup, "Our pricing is <b>$10/mo</b>.");
    }

    #[test]
    fn missing_or_non_string_response_is_rejected() {
        for body in [r#"{"answer": "hi"}"#, r#"{"response": null}"#, r#"{"response": 3}"#, r#"["hi"]"#] {
            let error = parse_answer(body).expect_err(body);
            assert!(matches!(error, AnswerError::MissingAnswer { .. }), "{body}");
            assert_eq!(error.kind(), FailureKind::Protocol);
        }
    }

    #[test]
    fn non_json_body_is_a_decode_error() {
        let error = parse_answer("<html>gateway</html>").expect_err("html body");
        assert!(matches!(error, AnswerError::Decode { .. }));
    }

    #[test]
    fn endpoint_is_resolved_against_origin() {
        let url = resolve_endpoint("https://atelier.example/shop/", "/ask").expect("url");
        assert_eq!(url.as_str(), "https://atelier.example/ask");

        let absolute =
            resolve_endpoint("https://atelier.example", "https://answers.example/ask").expect("url");
        assert_eq!(absolute.as_str(), "https://answers.example/ask");
    }

    #[test]
    fn relative_base_is_rejected() {
        let error = resolve_endpoint("atelier", "/ask").expect_err("no scheme");
        assert!(matches!(error, AnswerError::InvalidEndpoint { .. }));
    }

    #[test]
    fn long_bodies_are_truncated_for_logs() {
        let body = "x".repeat(MAX_LOGGED_BODY_CHARS + 10);
        let truncated = truncate_for_log(&body);
        assert_eq!(truncated.chars().count(), MAX_LOGGED_BODY_CHARS + 1);
    }
}
