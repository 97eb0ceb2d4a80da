//! System clipboard access and the transient "Copied" acknowledgment.

use std::fmt;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::core::conversation::{Conversation, MessageId};

/// How long the "Copied" label stays on a message.
pub const COPY_NOTICE_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug)]
pub enum ClipboardError {
    /// No clipboard could be opened (headless session, missing display server).
    Unavailable(String),
    /// The clipboard refused the write.
    Write(String),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipboardError::Unavailable(e) => write!(f, "clipboard unavailable: {e}"),
            ClipboardError::Write(e) => write!(f, "clipboard write failed: {e}"),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// Lazily opened system clipboard.
///
/// The handle is kept alive after the first copy: on X11 and Wayland the
/// copied text is served by the process that owns the handle.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        if let Some(clipboard) = self.inner.as_mut() {
            clipboard
                .set_text(text.to_owned())
                .map_err(|e| ClipboardError::Write(e.to_string()))?;
        }
        Ok(())
    }
}

/// Record of the last successful copy.
#[derive(Debug, Clone)]
pub struct CopyNotice {
    pub message_id: MessageId,
    /// Content at copy time; an edit to the message dismisses the notice.
    content: String,
    at: Instant,
}

impl CopyNotice {
    pub fn new(message_id: MessageId, content: &str, at: Instant) -> Self {
        Self {
            message_id,
            content: content.to_string(),
            at,
        }
    }

    /// The message that should show "Copied" at `now`, if any.
    pub fn active_message(&self, conversation: &Conversation, now: Instant) -> Option<MessageId> {
        if now.duration_since(self.at) >= COPY_NOTICE_DURATION {
            return None;
        }
        let message = conversation.get(self.message_id)?;
        (message.content == self.content).then_some(self.message_id)
    }
}

/// Copies the content of `message_id` and returns the notice to display.
///
/// Failures are logged and reported through the returned error; they never
/// interrupt the session.
pub fn copy_message(
    clipboard: &mut SystemClipboard,
    conversation: &Conversation,
    message_id: MessageId,
) -> Result<CopyNotice, ClipboardError> {
    let Some(message) = conversation.get(message_id) else {
        return Err(ClipboardError::Write(format!("no message {message_id}")));
    };
    match clipboard.copy(&message.content) {
        Ok(()) => {
            info!(
                "Copied message {} ({} bytes) to clipboard",
                message_id,
                message.content.len()
            );
            Ok(CopyNotice::new(message_id, &message.content, Instant::now()))
        }
        Err(e) => {
            warn!("Copy failed for message {}: {}", message_id, e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversation::Role;

    #[test]
    fn notice_active_within_window() {
        let mut conversation = Conversation::new();
        let id = conversation.push(Role::Model, "answer".to_string());
        let start = Instant::now();
        let notice = CopyNotice::new(id, "answer", start);

        assert_eq!(
            notice.active_message(&conversation, start + Duration::from_millis(500)),
            Some(id)
        );
        assert_eq!(
            notice.active_message(&conversation, start + COPY_NOTICE_DURATION),
            None
        );
    }

    #[test]
    fn notice_resets_when_content_changes() {
        let mut conversation = Conversation::new();
        conversation.push(Role::User, "q".to_string());
        let id = conversation.push(Role::Model, "par".to_string());
        let start = Instant::now();
        let notice = CopyNotice::new(id, "par", start);

        conversation.replace_last_model_content(id, "partial answer");
        assert_eq!(notice.active_message(&conversation, start), None);
    }

    #[test]
    fn notice_dropped_after_clear() {
        let mut conversation = Conversation::new();
        let id = conversation.push(Role::Model, "x".to_string());
        let start = Instant::now();
        let notice = CopyNotice::new(id, "x", start);

        conversation.clear();
        assert_eq!(notice.active_message(&conversation, start), None);
    }

    #[test]
    fn clipboard_error_display() {
        let err = ClipboardError::Unavailable("no display".into());
        assert_eq!(err.to_string(), "clipboard unavailable: no display");
    }
}
