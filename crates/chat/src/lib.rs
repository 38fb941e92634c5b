#![deny(unsafe_code)]

//! Chat exchange controller.
//!
//! One user turn appends the user's entry, raises the pending indicator,
//! awaits a single answer from the [`AnswerService`](atelier_answer::AnswerService)
//! and renders either the answer or one fixed failure message.
pub mod controller;
/// Page events and submission outcomes.
pub mod events;
/// Transcript entities.
pub mod message;
pub mod pending;
pub mod render;
pub mod surface;
pub mod transcript;
pub mod view;

pub use controller::{ExchangeController, PendingExchange};
pub use events::{IgnoreReason, InputEvent, SubmitOutcome};
pub use message::{EntryId, ExchangeId, MessageEntry, NodeBody, Role};
pub use pending::PendingIndicator;
pub use render::{escape_text, render_answer};
pub use surface::{ChatSurface, MemoryNode, MemorySurface};
pub use transcript::Transcript;
pub use view::ChatView;
