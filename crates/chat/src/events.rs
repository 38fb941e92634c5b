use atelier_answer::FailureKind;

use crate::message::{EntryId, ExchangeId};

/// Page events that can start a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    SendClicked,
    KeyPressed { key: String },
}

impl InputEvent {
    pub fn key(key: impl Into<String>) -> Self {
        Self::KeyPressed { key: key.into() }
    }

    /// Clicking send or pressing Enter submits; other keys only edit the field.
    pub fn is_submit(&self) -> bool {
        match self {
            Self::SendClicked => true,
            Self::KeyPressed { key } => key == "Enter",
        }
    }
}

/// Why a submission produced no side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// Nothing left after trimming.
    EmptyInput,
    /// An exchange is in flight and the input lock is enabled.
    Busy,
}

/// Result of one `submit` call, for callers and tests. Users only see the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ignored(IgnoreReason),
    Answered {
        exchange: ExchangeId,
        user: EntryId,
        reply: EntryId,
    },
    Failed {
        exchange: ExchangeId,
        user: EntryId,
        entry: EntryId,
        kind: FailureKind,
    },
}

impl SubmitOutcome {
    pub fn exchange(&self) -> Option<ExchangeId> {
        match self {
            Self::Ignored(_) => None,
            Self::Answered { exchange, .. } | Self::Failed { exchange, .. } => Some(*exchange),
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }

    /// Short stable label handed to page scripts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ignored(IgnoreReason::EmptyInput) => "ignored-empty",
            Self::Ignored(IgnoreReason::Busy) => "ignored-busy",
            Self::Answered { .. } => "answered",
            Self::Failed { .. } => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_click_and_enter_submit() {
        assert!(InputEvent::SendClicked.is_submit());
        assert!(InputEvent::key("Enter").is_submit());
        assert!(!InputEvent::key("a").is_submit());
        assert!(!InputEvent::key("Shift").is_submit());
    }

    #[test]
    fn labels_distinguish_ignore_reasons() {
        assert_eq!(
            SubmitOutcome::Ignored(IgnoreReason::EmptyInput).label(),
            "ignored-empty"
        );
        assert_eq!(SubmitOutcome::Ignored(IgnoreReason::Busy).label(), "ignored-busy");
        let failed = SubmitOutcome::Failed {
            exchange: ExchangeId::new(1),
            user: EntryId::new(1),
            entry: EntryId::new(2),
            kind: FailureKind::Transport,
        };
        assert_eq!(failed.label(), "failed");
        assert_eq!(failed.exchange(), Some(ExchangeId::new(1)));
    }
}
