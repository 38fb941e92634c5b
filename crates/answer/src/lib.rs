//! Client side of the answering service contract.
mod http;
mod provider;
mod scripted;

pub use http::{HTTP_ANSWER_SERVICE_ID, HttpAnswerService, parse_answer, resolve_endpoint};
pub use provider::{
    Answer, AnswerError, AnswerResult, AnswerService, AskRequest, FailureKind, LocalBoxFuture,
};
pub use scripted::{SCRIPTED_ANSWER_SERVICE_ID, ScriptedAnswerService};

pub async fn ask(service: &dyn AnswerService, question: impl Into<String>) -> AnswerResult<Answer> {
    service.ask(AskRequest::new(question)).await
}
