//! # Actions
//!
//! Everything that can happen in Lume becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! The endpoint answers? That's `Action::ResponseUpdated { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing the I/O the adapter must
//! perform. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! This makes everything testable: apply actions, assert on the state.
//! And debuggable: log every action, replay the exact session.

use log::{debug, info};

use crate::core::conversation::{MessageId, Role};
use crate::core::state::{App, Phase};

/// Banner text used when a failure carries no message of its own.
pub const FALLBACK_ERROR: &str = "Connection interrupted. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The input box value changed (full new value).
    PromptChanged(String),
    /// Send the current prompt.
    Submit,
    /// The reply to `reply_to` so far. Replaces, never appends.
    ResponseUpdated { reply_to: MessageId, content: String },
    /// The reply sequence for `reply_to` completed.
    ResponseDone { reply_to: MessageId },
    /// The reply sequence for `reply_to` failed.
    ResponseFailed { reply_to: MessageId, message: String },
    /// Stop waiting for the in-flight reply.
    CancelGeneration,
    /// Drop the whole conversation.
    ClearChat,
    Quit,
}

/// Side effects requested by `update()`, executed by the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Start generating a reply to `prompt` into the model message `reply_to`.
    SpawnRequest { prompt: String, reply_to: MessageId },
    /// Abort the in-flight request tasks.
    AbortRequest,
    Quit,
}

/// Applies `action` to `app` and returns the effect the adapter must run.
pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::PromptChanged(value) => {
            if !app.is_streaming() {
                app.prompt = value;
            }
            Effect::None
        }
        Action::Submit => submit(app),
        Action::ResponseUpdated { reply_to, content } => {
            if app.phase != (Phase::Streaming { reply_to }) {
                debug!("Ignoring update for inactive message {}", reply_to);
                return Effect::None;
            }
            if !app.conversation.replace_last_model_content(reply_to, &content) {
                debug!("Message {} is no longer the live message", reply_to);
            }
            Effect::None
        }
        Action::ResponseDone { reply_to } => {
            if app.phase == (Phase::Streaming { reply_to }) {
                info!("Reply {} complete", reply_to);
                app.phase = Phase::Idle;
                app.status_message = String::from("Ready");
            }
            Effect::None
        }
        Action::ResponseFailed { reply_to, message } => {
            if app.phase == (Phase::Streaming { reply_to }) {
                info!("Reply {} failed: {}", reply_to, message);
                app.phase = Phase::Idle;
                app.error = Some(if message.trim().is_empty() {
                    FALLBACK_ERROR.to_string()
                } else {
                    message
                });
                app.status_message = String::from("Error");
            }
            Effect::None
        }
        Action::CancelGeneration => {
            if !app.is_streaming() {
                return Effect::None;
            }
            info!("Generation cancelled by user");
            app.phase = Phase::Idle;
            app.status_message = String::from("Cancelled");
            Effect::AbortRequest
        }
        Action::ClearChat => {
            if !app.can_clear() {
                app.status_message = String::from("Wait for the reply before clearing");
                return Effect::None;
            }
            app.conversation.clear();
            app.error = None;
            app.prompt.clear();
            app.status_message = String::from("Chat cleared");
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn submit(app: &mut App) -> Effect {
    if !app.can_submit() {
        debug!(
            "Submit rejected (streaming={}, prompt_len={})",
            app.is_streaming(),
            app.prompt.len()
        );
        return Effect::None;
    }

    let prompt = std::mem::take(&mut app.prompt).trim().to_string();
    app.error = None;
    app.conversation.push(Role::User, prompt.clone());
    let reply_to = app.conversation.push(Role::Model, String::new());
    app.phase = Phase::Streaming { reply_to };
    app.status_message = String::from("Thinking...");

    info!("Submitted prompt ({} bytes), reply_to={}", prompt.len(), reply_to);
    Effect::SpawnRequest { prompt, reply_to }
}
