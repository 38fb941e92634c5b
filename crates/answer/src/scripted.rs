use std::cell::RefCell;
use std::collections::VecDeque;

use futures::FutureExt;
use futures::channel::oneshot;

use super::provider::{
    Answer, AnswerError, AnswerResult, AnswerService, AskRequest, FailureKind, LocalBoxFuture,
};

pub const SCRIPTED_ANSWER_SERVICE_ID: &str = "scripted";

enum Reply {
    Ready(AnswerResult<Answer>),
    Deferred(oneshot::Receiver<AnswerResult<Answer>>),
}

/// In-memory answering service that replays queued replies in ask order.
///
/// Deferred replies resolve only when their sender fires, which lets callers
/// decide the order in which overlapping exchanges complete.
#[derive(Default)]
pub struct ScriptedAnswerService {
    replies: RefCell<VecDeque<Reply>>,
    requests: RefCell<Vec<AskRequest>>,
}

impl ScriptedAnswerService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_answer(&self, markup: impl Into<String>) {
        self.replies
            .borrow_mut()
            .push_back(Reply::Ready(Ok(Answer::new(markup))));
    }

    pub fn push_failure(&self, kind: FailureKind, details: impl Into<String>) {
        self.replies
            .borrow_mut()
            .push_back(Reply::Ready(Err(AnswerError::scripted(kind, details))));
    }

    pub fn push_error(&self, error: AnswerError) {
        self.replies.borrow_mut().push_back(Reply::Ready(Err(error)));
    }

    /// Queues a reply that stays pending until the returned sender is used.
    pub fn defer(&self) -> oneshot::Sender<AnswerResult<Answer>> {
        let (tx, rx) = oneshot::channel();
        self.replies.borrow_mut().push_back(Reply::Deferred(rx));
        tx
    }

    pub fn requests(&self) -> Vec<AskRequest> {
        self.requests.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.replies.borrow().len()
    }
}

impl AnswerService for ScriptedAnswerService {
    fn id(&self) -> &str {
        SCRIPTED_ANSWER_SERVICE_ID
    }

    fn ask<'a>(&'a self, request: AskRequest) -> LocalBoxFuture<'a, AnswerResult<Answer>> {
        self.requests.borrow_mut().push(request);
        let reply = self.replies.borrow_mut().pop_front();

        async move {
            match reply {
                Some(Reply::Ready(result)) => result,
                Some(Reply::Deferred(rx)) => rx.await.unwrap_or_else(|_| {
                    Err(AnswerError::scripted(
                        FailureKind::Transport,
                        "deferred reply was dropped",
                    ))
                }),
                None => Err(AnswerError::scripted(
                    FailureKind::Transport,
                    "no scripted reply queued",
                )),
            }
        }
        .boxed_local()
    }
}
