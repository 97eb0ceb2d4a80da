//! # TitleBar Component
//!
//! Top status bar showing application state and notifications.
//!
//! ## Responsibilities
//!
//! - Display the product name
//! - Display status messages (e.g., "Thinking...", "Cancelled", "Chat cleared")
//! - Show "↓ New" indicator when there's unseen content below scroll
//!
//! ## Design Decisions
//!
//! TitleBar is purely presentational: it receives all data as props and has no
//! internal state. Props come from different sources:
//! - `status_message`: Core App state
//! - `is_streaming`: Core App state (phase)
//! - `has_unseen_content`: TUI state (scroll position indicator)
//!
//! ## Conditional Formatting
//!
//! 1. **Unseen content**: `"LumeAI | Thinking... | ↓ New"`
//! 2. **Status message**: `"LumeAI | Ready"`
//! 3. **Default**: `"LumeAI"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub const PRODUCT_NAME: &str = "LumeAI";

pub struct TitleBar {
    /// Status message (e.g., "Thinking...", "Ready")
    pub status_message: String,
    /// Whether a reply is being generated
    pub is_streaming: bool,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(status_message: String, is_streaming: bool, has_unseen_content: bool) -> Self {
        Self {
            status_message,
            is_streaming,
            has_unseen_content,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let status_style = if self.is_streaming {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let mut spans = vec![Span::styled(
            PRODUCT_NAME,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(self.status_message.clone(), status_style));
        }
        if self.has_unseen_content {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled("↓ New", Style::default().fg(Color::Green)));
        }

        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_to_string(title_bar: &mut TitleBar) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        terminal.draw(|f| title_bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_title_bar_with_unseen_content() {
        let mut title_bar = TitleBar::new("Thinking...".to_string(), true, true);
        let text = render_to_string(&mut title_bar);

        assert!(text.contains("LumeAI"));
        assert!(text.contains("Thinking..."));
        assert!(text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_with_status_message() {
        let mut title_bar = TitleBar::new("Ready".to_string(), false, false);
        let text = render_to_string(&mut title_bar);

        assert!(text.contains("LumeAI | Ready"));
        assert!(!text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_default_no_status() {
        let mut title_bar = TitleBar::new(String::new(), false, false);
        let text = render_to_string(&mut title_bar);
        assert_eq!(text.trim_end(), "LumeAI");
    }

    #[test]
    fn test_title_text_order() {
        let mut title_bar = TitleBar::new("Cancelled".to_string(), false, true);
        let text = render_to_string(&mut title_bar);
        assert_eq!(text.trim_end(), "LumeAI | Cancelled | ↓ New");
    }
}
