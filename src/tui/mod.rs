//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (landing page, streaming reply, copy notice): draws every
//!   ~80ms so the pulse and the notice expiry look smooth.
//! - **Idle** (conversation, no input): sleeps up to 500ms, only redraws on events
//!   or terminal resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.
//!
//! ## Requests
//!
//! Each `Effect::SpawnRequest` starts two tokio tasks: one drives the
//! `GenerationClient`, the other accumulates chunks and posts
//! `ResponseUpdated` / `ResponseDone` / `ResponseFailed` back to the loop.
//! Their abort handles are held until the request ends, is cancelled, or the
//! app exits.

mod clipboard;
mod component;
mod components;
pub mod content;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use tokio::task::AbortHandle;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::conversation::{MessageId, Role};
use crate::core::state::App;
use crate::generation::{GenerationClient, HttpGenerationClient};
use crate::tui::clipboard::{CopyNotice, SystemClipboard, copy_message};
use crate::tui::component::EventHandler;
use crate::tui::components::input_box::{PLACEHOLDER_NEW, PLACEHOLDER_REPLY};
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Modal input mode: determines how keyboard events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigate messages with arrow keys. Typing auto-switches to Input.
    Cursor,
    /// Text editing in the input box. Esc switches to Cursor.
    Input,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub message_list: MessageListState,
    pub input_box: InputBox,
    // Modal input mode
    pub input_mode: InputMode,
    // Animation state
    pub pulse_value: f32,
    /// Last successful copy, shown as "Copied" until it expires
    pub copy_notice: Option<CopyNotice>,
    pub clipboard: SystemClipboard,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            input_mode: InputMode::Input, // User expects to type immediately
            pulse_value: 0.0,
            copy_notice: None,
            clipboard: SystemClipboard::new(),
        }
    }

    /// Push App-owned values into the InputBox before drawing.
    pub fn sync_props(&mut self, app: &App) {
        self.input_box.set_value(&app.prompt);
        self.input_box.disabled = app.is_streaming();
        self.input_box.dimmed = matches!(self.input_mode, InputMode::Cursor);
        self.input_box.placeholder = if app.conversation.is_empty() {
            PLACEHOLDER_NEW
        } else {
            PLACEHOLDER_REPLY
        };
    }

    /// Copy `message_id` and report the outcome in the title bar.
    fn copy(&mut self, app: &mut App, message_id: MessageId) {
        match copy_message(&mut self.clipboard, &app.conversation, message_id) {
            Ok(notice) => {
                self.copy_notice = Some(notice);
                app.status_message = "Copied".to_string();
            }
            Err(e) => app.status_message = e.to_string(),
        }
    }
}

/// The message at list index `index`, if it shows a copy affordance.
fn copy_target(app: &App, index: usize) -> Option<MessageId> {
    let message = app.conversation.messages().get(index)?;
    let finished = app.streaming_message() != Some(message.id);
    (message.role == Role::Model && finished && !message.content.is_empty()).then_some(message.id)
}

/// The newest model reply that is not still being generated.
fn latest_copy_target(app: &App) -> Option<MessageId> {
    app.conversation
        .latest_model_message()
        .filter(|m| app.streaming_message() != Some(m.id) && !m.content.is_empty())
        .map(|m| m.id)
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol allows Shift+Enter detection; terminals
        // without it ignore the request.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!(
            "Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)"
        );
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

fn abort_all(handles: &mut Vec<AbortHandle>) {
    if !handles.is_empty() {
        info!("Aborting {} request task(s)", handles.len());
    }
    for handle in handles.drain(..) {
        handle.abort();
    }
}

/// Run an effect returned by the reducer. Returns `true` on `Effect::Quit`.
fn apply_effect(
    effect: Effect,
    app: &App,
    active_abort_handles: &mut Vec<AbortHandle>,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match effect {
        Effect::None => false,
        Effect::SpawnRequest { prompt, reply_to } => {
            abort_all(active_abort_handles);
            *active_abort_handles = spawn_request(app.client.clone(), prompt, reply_to, tx.clone());
            false
        }
        Effect::AbortRequest => {
            abort_all(active_abort_handles);
            false
        }
        Effect::Quit => true,
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let client = HttpGenerationClient::from_config(&config);
    info!("Generation endpoint: {}", client.endpoint());
    let mut app = App::new(Arc::new(client));
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    // Abort handles for the in-flight request (Esc-to-cancel and exit)
    let mut active_abort_handles: Vec<AbortHandle> = Vec::new();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        tui.sync_props(&app);

        // Drop the copy notice once it expires (needs one more frame to clear)
        let notice_active = match &tui.copy_notice {
            Some(notice) => {
                let active = notice
                    .active_message(&app.conversation, Instant::now())
                    .is_some();
                if !active {
                    tui.copy_notice = None;
                    needs_redraw = true;
                }
                active
            }
            None => false,
        };

        let animating = app.is_streaming() || app.conversation.is_empty() || notice_active;
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            tui.pulse_value = (elapsed * 5.0).sin() * 0.5 + 0.5;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match event {
                // Resize just needs a redraw (already flagged above)
                TuiEvent::Resize => continue,
                // Ctrl+C always quits regardless of mode
                TuiEvent::ForceQuit => {
                    let effect = update(&mut app, Action::Quit);
                    should_quit |= apply_effect(effect, &app, &mut active_abort_handles, &tx);
                    continue;
                }
                // Esc while streaming cancels in either mode
                TuiEvent::Escape if app.is_streaming() => {
                    let effect = update(&mut app, Action::CancelGeneration);
                    should_quit |= apply_effect(effect, &app, &mut active_abort_handles, &tx);
                    continue;
                }
                TuiEvent::ClearChat => {
                    let effect = update(&mut app, Action::ClearChat);
                    should_quit |= apply_effect(effect, &app, &mut active_abort_handles, &tx);
                    if app.conversation.is_empty() {
                        tui.message_list.reset();
                        tui.copy_notice = None;
                        tui.input_mode = InputMode::Input;
                    }
                    continue;
                }
                TuiEvent::CopyLatest => {
                    match latest_copy_target(&app) {
                        Some(id) => tui.copy(&mut app, id),
                        None => app.status_message = "Nothing to copy yet".to_string(),
                    }
                    continue;
                }
                // Mouse hover is always active regardless of mode
                TuiEvent::MouseMove(_col, row) => {
                    let main = ui::layout(terminal.get_frame().area(), &app, &tui).main;
                    tui.message_list.selected_index = ui::hit_test_message(
                        row,
                        main,
                        tui.message_list.scroll_state.offset().y,
                        &tui.message_list.layout.prefix_heights,
                    );
                    continue;
                }
                // Click on a finished reply copies it
                TuiEvent::MouseClick(_col, row) => {
                    let main = ui::layout(terminal.get_frame().area(), &app, &tui).main;
                    let hit = ui::hit_test_message(
                        row,
                        main,
                        tui.message_list.scroll_state.offset().y,
                        &tui.message_list.layout.prefix_heights,
                    );
                    if let Some(idx) = hit {
                        tui.message_list.selected_index = Some(idx);
                        if let Some(id) = copy_target(&app, idx) {
                            tui.copy(&mut app, id);
                        }
                    }
                    continue;
                }
                // Scroll events always go to MessageList regardless of mode
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown => {
                    tui.message_list.handle_event(&event);
                    continue;
                }
                _ => {}
            }

            // Modal event dispatch
            match tui.input_mode {
                InputMode::Input => {
                    if matches!(event, TuiEvent::Escape) {
                        tui.input_mode = InputMode::Cursor;
                        tui.message_list.selected_index = None;
                        tui.message_list.move_selection(-1);
                        continue;
                    }

                    let action = match tui.input_box.handle_event(&event) {
                        Some(InputEvent::Changed(value)) => Action::PromptChanged(value),
                        Some(InputEvent::Submit) => Action::Submit,
                        None => continue,
                    };
                    let effect = update(&mut app, action);
                    should_quit |= apply_effect(effect, &app, &mut active_abort_handles, &tx);
                }
                InputMode::Cursor => match event {
                    TuiEvent::CursorUp => tui.message_list.move_selection(-1),
                    TuiEvent::CursorDown => tui.message_list.move_selection(1),
                    TuiEvent::InputChar('y') | TuiEvent::InputChar('c') => {
                        if let Some(id) = tui
                            .message_list
                            .selected_index
                            .and_then(|idx| copy_target(&app, idx))
                        {
                            tui.copy(&mut app, id);
                        }
                    }
                    // Typing auto-switches to Input mode and forwards the event
                    TuiEvent::InputChar(_) | TuiEvent::Paste(_) => {
                        tui.input_mode = InputMode::Input;
                        tui.message_list.selected_index = None;
                        if let Some(InputEvent::Changed(value)) = tui.input_box.handle_event(&event)
                        {
                            update(&mut app, Action::PromptChanged(value));
                        }
                    }
                    // Enter switches to Input mode
                    TuiEvent::Submit => {
                        tui.input_mode = InputMode::Input;
                        tui.message_list.selected_index = None;
                    }
                    _ => {}
                },
            }
        }

        if should_quit {
            break;
        }

        // Handle background task actions (streaming responses)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let ends_request = matches!(
                action,
                Action::ResponseDone { .. } | Action::ResponseFailed { .. }
            );
            let effect = update(&mut app, action);
            should_quit |= apply_effect(effect, &app, &mut active_abort_handles, &tx);
            if ends_request && !app.is_streaming() {
                active_abort_handles.clear();
            }
        }

        if should_quit {
            break;
        }
    }

    abort_all(&mut active_abort_handles);
    ratatui::restore();
    Ok(())
}

/// Start generating a reply to `prompt` for the model message `reply_to`.
///
/// Returns the abort handles of both tasks, forwarder first so that aborting
/// in order never lets it observe the client's channel closing.
pub(crate) fn spawn_request(
    client: Arc<dyn GenerationClient>,
    prompt: String,
    reply_to: MessageId,
    tx: mpsc::Sender<Action>,
) -> Vec<AbortHandle> {
    info!(
        "Spawning request via {} (reply_to={}, prompt_len={})",
        client.name(),
        reply_to,
        prompt.len()
    );

    let (chunk_tx, mut chunk_rx) = tokio::sync::mpsc::channel::<String>(100);
    let (result_tx, result_rx) = tokio::sync::oneshot::channel();

    let stream_handle = tokio::spawn(async move {
        let result = client.generate(&prompt, chunk_tx).await;
        if let Err(e) = &result {
            info!("Generation error: {}", e);
        }
        // The forwarder may already be gone after a cancel
        let _ = result_tx.send(result);
    });

    let forward_handle = tokio::spawn(async move {
        let request_start = Instant::now();
        let mut accumulated = String::new();
        let mut chunk_count = 0usize;

        while let Some(chunk) = chunk_rx.recv().await {
            chunk_count += 1;
            accumulated.push_str(&chunk);
            debug!(
                "Forwarding ResponseUpdated (chunk_len={}, total={})",
                chunk.len(),
                accumulated.len()
            );
            let action = Action::ResponseUpdated {
                reply_to,
                content: accumulated.clone(),
            };
            if tx.send(action).is_err() {
                warn!("Failed to forward ResponseUpdated: receiver dropped");
                return;
            }
        }

        // Chunk channel closed: the client has returned (or panicked)
        let final_action = match result_rx.await {
            Ok(Ok(())) => Action::ResponseDone { reply_to },
            Ok(Err(e)) => Action::ResponseFailed {
                reply_to,
                message: e.to_string(),
            },
            Err(_) => Action::ResponseFailed {
                reply_to,
                message: String::new(),
            },
        };
        info!(
            "Request finished: {} chunks, {} bytes in {}ms",
            chunk_count,
            accumulated.len(),
            request_start.elapsed().as_millis()
        );
        if tx.send(final_action).is_err() {
            warn!("Failed to send request outcome: receiver dropped");
        }
    });

    vec![forward_handle.abort_handle(), stream_handle.abort_handle()]
}
