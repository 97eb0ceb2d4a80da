//! # Conversation
//!
//! The ordered list of chat messages. Insertion order is display order.
//!
//! ```text
//! Conversation
//! ├── messages: Vec<Message>   // oldest first
//! └── next_id: u64            // monotonic id allocator, survives clear()
//! ```
//!
//! Only the last message may change after creation: it is the model
//! placeholder being filled in by the active request.

use std::fmt;

/// Unique message identifier. Increases with creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<Message>,
    next_id: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Appends a message and returns its freshly allocated id.
    pub fn push(&mut self, role: Role, content: String) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(Message { id, role, content });
        id
    }

    /// Replaces the content of the last message if it is the model message `id`.
    ///
    /// Returns `false` (and changes nothing) when `id` is not the live message.
    pub fn replace_last_model_content(&mut self, id: MessageId, content: &str) -> bool {
        match self.messages.last_mut() {
            Some(last) if last.id == id && last.role == Role::Model => {
                if last.content != content {
                    last.content.clear();
                    last.content.push_str(content);
                }
                true
            }
            _ => false,
        }
    }

    /// Removes every message. Ids keep increasing afterwards.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// The most recent model message, if any.
    pub fn latest_model_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == Role::Model)
    }
}
