//! # Application State
//!
//! Core business state for Lume. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── client: Arc<dyn GenerationClient>  // where replies come from
//! ├── conversation: Conversation         // message history
//! ├── prompt: String                     // input box value
//! ├── phase: Phase                       // Idle | Streaming { reply_to }
//! ├── error: Option<String>              // last error, shown as a banner
//! └── status_message: String             // title bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::sync::Arc;

use crate::core::conversation::{Conversation, MessageId};
use crate::generation::GenerationClient;

/// Request lifecycle. At most one request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Waiting for the reply that fills the model message `reply_to`.
    Streaming { reply_to: MessageId },
}

pub struct App {
    pub client: Arc<dyn GenerationClient>,
    pub conversation: Conversation,
    pub prompt: String,
    pub phase: Phase,
    pub error: Option<String>,
    pub status_message: String,
}

impl App {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self {
            client,
            conversation: Conversation::new(),
            prompt: String::new(),
            phase: Phase::Idle,
            error: None,
            status_message: String::from("Welcome to Lume!"),
        }
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self.phase, Phase::Streaming { .. })
    }

    /// The model message currently being filled in, if any.
    pub fn streaming_message(&self) -> Option<MessageId> {
        match self.phase {
            Phase::Streaming { reply_to } => Some(reply_to),
            Phase::Idle => None,
        }
    }

    /// Whether `Submit` would be accepted right now.
    pub fn can_submit(&self) -> bool {
        !self.is_streaming() && !self.prompt.trim().is_empty()
    }

    /// Whether `ClearChat` would be accepted right now.
    pub fn can_clear(&self) -> bool {
        !self.is_streaming()
    }
}
