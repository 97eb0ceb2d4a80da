//! # InputBox Component
//!
//! Multi-line prompt editor bound to the controller-owned prompt.
//!
//! ## Responsibilities
//!
//! - Capture text input
//! - Handle editing (backspace, delete, word deletion, cursor movement, paste)
//! - Handle submission (Enter)
//! - Grow with content up to `MAX_VISIBLE_LINES`, then scroll internally
//! - Show a placeholder when empty and a character counter in the border
//!
//! ## State Management
//!
//! The prompt value belongs to `App`. The parent pushes it in every frame with
//! [`InputBox::set_value`]; every edit is reported back as
//! [`InputEvent::Changed`] with the full new value. Cursor position and scroll
//! state are local and live in `CursorState`.

mod cursor;
mod text_wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::CursorState;
use text_wrap::{
    MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, inner_width, next_char_boundary, next_word_boundary,
    prev_char_boundary, prev_word_boundary, wrap_line_count, wrap_options,
};

pub const PLACEHOLDER_NEW: &str = "Ask Lume anything...";
pub const PLACEHOLDER_REPLY: &str = "Reply to Lume...";

const TITLE: &str = "Message";
const DISABLED_TITLE: &str = "Waiting for Lume...";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// The text changed; carries the full new value
    Changed(String),
    /// Enter pressed (nothing inserted)
    Submit,
}

/// Text input component.
///
/// # Props
///
/// - `disabled`: rejects edits and submission, renders dimmed
/// - `dimmed`: visual only, while the message list has focus
/// - `placeholder`: shown when the buffer is empty
pub struct InputBox {
    buffer: String,
    pub disabled: bool,
    pub dimmed: bool,
    pub placeholder: &'static str,
    cursor: CursorState,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            disabled: false,
            dimmed: false,
            placeholder: PLACEHOLDER_NEW,
            cursor: CursorState::new(),
        }
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    /// Reflect the externally owned value. A no-op when it already matches,
    /// so the cursor survives the per-frame sync.
    pub fn set_value(&mut self, value: &str) {
        if self.buffer != value {
            self.buffer = value.to_string();
            self.cursor.move_to_end(&self.buffer);
        }
    }

    /// Calculate required height for current buffer content, clamped to viewport limits.
    /// Returns value in range [1 + VERTICAL_OVERHEAD, MAX_VISIBLE_LINES + VERTICAL_OVERHEAD].
    pub fn calculate_height(&self, content_width: u16) -> u16 {
        let width = inner_width(content_width);
        let content_lines = wrap_line_count(&self.buffer, width);
        content_lines.min(MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn changed(&self) -> Option<InputEvent> {
        Some(InputEvent::Changed(self.buffer.clone()))
    }

    /// The wrapped lines currently inside the viewport.
    fn get_visible_text(&self, content_width: u16) -> String {
        if self.cursor.scroll_offset == 0 {
            return self.buffer.clone();
        }

        let width = inner_width(content_width);
        if width == 0 {
            return String::new();
        }

        let lines = textwrap::wrap(&self.buffer, wrap_options(width));
        let start = (self.cursor.scroll_offset as usize).min(lines.len());
        let end = (start + MAX_VISIBLE_LINES as usize).min(lines.len());

        lines[start..end].join("\n")
    }

    /// Render scrollbar when content exceeds visible area
    fn render_scrollbar(&self, frame: &mut Frame, area: Rect) {
        use ratatui::widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState};

        let total_lines = wrap_line_count(&self.buffer, inner_width(area.width));
        if total_lines <= MAX_VISIBLE_LINES {
            return;
        }

        // ScrollbarState content_length is max scrollable position, not total items
        let max_scroll = total_lines.saturating_sub(MAX_VISIBLE_LINES);
        let mut scrollbar_state = ScrollbarState::default()
            .content_length(max_scroll as usize)
            .position(self.cursor.scroll_offset as usize);

        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };

        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            scrollbar_area,
            &mut scrollbar_state,
        );
    }

    fn insert(&mut self, text: &str) -> Option<InputEvent> {
        self.buffer.insert_str(self.cursor.pos, text);
        self.cursor.pos += text.len();
        self.changed()
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.cursor.last_content_width = area.width;
        self.cursor.update_scroll_offset(&self.buffer, area.width);

        let (title, style) = if self.disabled {
            (
                DISABLED_TITLE,
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
            )
        } else if self.dimmed {
            (TITLE, Style::default().fg(Color::Green).add_modifier(Modifier::DIM))
        } else {
            (TITLE, Style::default().fg(Color::Green))
        };

        let counter = format!("{} chars", self.buffer.chars().count());
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(title)
            .title_bottom(Line::from(counter).right_aligned())
            .border_style(style);

        let input = if self.buffer.is_empty() {
            Paragraph::new(self.placeholder).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Paragraph::new(self.get_visible_text(area.width)).style(style)
        };

        frame.render_widget(input.block(block), area);
        self.render_scrollbar(frame, area);

        if !self.disabled && !self.dimmed {
            let (cursor_x, cursor_y) = self.cursor.screen_pos(&self.buffer, area);
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.disabled {
            return None;
        }

        match event {
            TuiEvent::InputChar(c) => {
                let mut encoded = [0u8; 4];
                self.insert(c.encode_utf8(&mut encoded))
            }
            TuiEvent::Paste(text) => {
                // Terminals send CR for line breaks inside bracketed paste
                let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
                self.insert(&normalized)
            }
            TuiEvent::Backspace => {
                if self.cursor.pos == 0 {
                    return None;
                }
                let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(prev..self.cursor.pos);
                self.cursor.pos = prev;
                self.changed()
            }
            TuiEvent::DeleteWord => {
                if self.cursor.pos == 0 {
                    return None;
                }
                let start = prev_word_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(start..self.cursor.pos);
                self.cursor.pos = start;
                self.changed()
            }
            TuiEvent::Delete => {
                if self.cursor.pos >= self.buffer.len() {
                    return None;
                }
                let next = next_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(self.cursor.pos..next);
                self.changed()
            }
            TuiEvent::CursorLeft => {
                if self.cursor.pos > 0 {
                    self.cursor.pos = prev_char_boundary(&self.buffer, self.cursor.pos);
                }
                None
            }
            TuiEvent::CursorRight => {
                if self.cursor.pos < self.buffer.len() {
                    self.cursor.pos = next_char_boundary(&self.buffer, self.cursor.pos);
                }
                None
            }
            TuiEvent::WordLeft => {
                self.cursor.pos = prev_word_boundary(&self.buffer, self.cursor.pos);
                None
            }
            TuiEvent::WordRight => {
                self.cursor.pos = next_word_boundary(&self.buffer, self.cursor.pos);
                None
            }
            TuiEvent::CursorHome => {
                self.cursor.pos = self.buffer[..self.cursor.pos]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                None
            }
            TuiEvent::CursorEnd => {
                self.cursor.pos = self.buffer[self.cursor.pos..]
                    .find('\n')
                    .map(|i| self.cursor.pos + i)
                    .unwrap_or(self.buffer.len());
                None
            }
            TuiEvent::CursorUp => {
                let width = self.cursor.last_content_width;
                self.cursor.move_vertically(&self.buffer, -1, width);
                None
            }
            TuiEvent::CursorDown => {
                let width = self.cursor.last_content_width;
                self.cursor.move_vertically(&self.buffer, 1, width);
                None
            }
            TuiEvent::Submit => Some(InputEvent::Submit),
            _ => None,
        }
    }
}
