use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use snafu::Snafu;

/// Request body sent to the answering service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

impl AskRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// Validated reply. `markup` is rich text the service vouches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub markup: String,
}

impl Answer {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }
}

/// Coarse failure class. Users never see the difference; logs do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The exchange never completed at the network level.
    Transport,
    /// A response arrived but was not a usable answer.
    Protocol,
}

pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;
pub type AnswerResult<T> = Result<T, AnswerError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AnswerError {
    #[snafu(display("answer endpoint '{endpoint}' is invalid on `{stage}`: {details}"))]
    InvalidEndpoint {
        stage: &'static str,
        endpoint: String,
        details: String,
    },
    #[snafu(display("http transport failed on `{stage}`, {source}"))]
    Transport {
        stage: &'static str,
        source: reqwest::Error,
    },
    #[snafu(display("failed to read answer body on `{stage}`, {source}"))]
    ReadBody {
        stage: &'static str,
        source: reqwest::Error,
    },
    #[snafu(display("answer endpoint returned status {status}: {body}"))]
    Status {
        stage: &'static str,
        status: u16,
        body: String,
    },
    #[snafu(display("answer body is not valid JSON on `{stage}`: {source}"))]
    Decode {
        stage: &'static str,
        source: serde_json::Error,
    },
    #[snafu(display("answer body has no string `response` field on `{stage}`"))]
    MissingAnswer { stage: &'static str },
    #[snafu(display("scripted answer service failed on `{stage}`: {details}"))]
    Scripted {
        stage: &'static str,
        kind: FailureKind,
        details: String,
    },
}

impl AnswerError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidEndpoint { .. } | Self::Transport { .. } => FailureKind::Transport,
            // A response arrived; its body being cut short is a protocol fault.
            Self::ReadBody { .. }
            | Self::Status { .. }
            | Self::Decode { .. }
            | Self::MissingAnswer { .. } => FailureKind::Protocol,
            Self::Scripted { kind, .. } => *kind,
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidEndpoint { stage, .. }
            | Self::Transport { stage, .. }
            | Self::ReadBody { stage, .. }
            | Self::Status { stage, .. }
            | Self::Decode { stage, .. }
            | Self::MissingAnswer { stage }
            | Self::Scripted { stage, .. } => stage,
        }
    }

    /// Builds an error for in-memory services used by hosts and tests.
    pub fn scripted(kind: FailureKind, details: impl Into<String>) -> Self {
        Self::Scripted {
            stage: "scripted-answer",
            kind,
            details: details.into(),
        }
    }
}

/// One request/response round trip with the answering service.
///
/// Futures are not `Send`: the browser runs every exchange on its single event loop.
pub trait AnswerService {
    fn id(&self) -> &str;
    fn ask<'a>(&'a self, request: AskRequest) -> LocalBoxFuture<'a, AnswerResult<Answer>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_body_failures_are_protocol_failures() {
        let status = AnswerError::Status {
            stage: "ask-http-status",
            status: 500,
            body: "boom".to_string(),
        };
        let missing = AnswerError::MissingAnswer {
            stage: "extract-answer",
        };
        let decode = AnswerError::Decode {
            stage: "decode-answer",
            source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        };

        assert_eq!(status.kind(), FailureKind::Protocol);
        assert_eq!(missing.kind(), FailureKind::Protocol);
        assert_eq!(decode.kind(), FailureKind::Protocol);
        assert_eq!(status.stage(), "ask-http-status");
    }

    #[test]
    fn truncated_body_is_a_protocol_failure() {
        let source = reqwest::Client::new()
            .get("not a url")
            .build()
            .expect_err("invalid url");
        let error = AnswerError::ReadBody {
            stage: "read-ask-response",
            source,
        };
        assert_eq!(error.kind(), FailureKind::Protocol);
    }

    #[test]
    fn invalid_endpoint_is_a_transport_failure() {
        let error = AnswerError::InvalidEndpoint {
            stage: "resolve-endpoint",
            endpoint: "::".to_string(),
            details: "relative URL without a base".to_string(),
        };
        assert_eq!(error.kind(), FailureKind::Transport);
    }

    #[test]
    fn scripted_errors_keep_their_kind() {
        let error = AnswerError::scripted(FailureKind::Transport, "offline");
        assert_eq!(error.kind(), FailureKind::Transport);
        assert!(error.to_string().contains("offline"));
    }

    #[test]
    fn request_serializes_as_single_field_object() {
        let body = serde_json::to_value(AskRequest::new("What is your pricing?")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "question": "What is your pricing?" })
        );
    }
}
