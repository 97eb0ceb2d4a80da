use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};

use crate::core::conversation::{Message as ChatMessage, Role};
use crate::tui::component::Component;
use crate::tui::content;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Pulse intensity threshold above which the border transitions from normal to BOLD.
const PULSE_BOLD_THRESHOLD: f32 = 0.6;
/// Pulse intensity threshold above which the border transitions from DIM to normal.
const PULSE_NORMAL_THRESHOLD: f32 = 0.2;

pub const USER_TITLE: &str = "You";
pub const RESPONSE_TITLE: &str = "Response";
pub const STREAMING_TITLE: &str = "Lume is creating...";

/// A stateless component that renders a single chat message as a card.
///
/// # Design
///
/// `Message` is a **transient component**: it's created fresh each frame with the data
/// it needs to render. Selection, streaming and copy state are passed in by the
/// parent `MessageList`.
///
/// # Styling
///
/// - **User** (green): the prompt, rendered verbatim
/// - **Model** (blue): the reply, with fenced code blocks framed and highlighted
///
/// Model cards carry a right-aligned "Copy" affordance that reads "Copied"
/// for two seconds after a copy.
///
/// # Height Calculation
///
/// The body is pre-wrapped by [`content`], so [`calculate_height`](Self::calculate_height)
/// is the body line count plus borders. No rendering needed.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub message: &'a ChatMessage,
    /// This is the live model message of the in-flight request
    pub is_streaming: bool,
    /// Whether this message is selected in Cursor mode
    pub is_selected: bool,
    /// Whether the copy acknowledgment is showing
    pub is_copied: bool,
    /// Current pulse intensity (0.0 to 1.0) for active generation animation
    pub pulse_intensity: f32,
}

impl<'a> Message<'a> {
    pub fn new(message: &'a ChatMessage, is_streaming: bool) -> Self {
        Self {
            message,
            is_streaming,
            is_selected: false,
            is_copied: false,
            pulse_intensity: 0.0,
        }
    }

    pub fn selected(mut self, is_selected: bool) -> Self {
        self.is_selected = is_selected;
        self
    }

    pub fn copied(mut self, is_copied: bool) -> Self {
        self.is_copied = is_copied;
        self
    }

    pub fn pulse(mut self, pulse_intensity: f32) -> Self {
        self.pulse_intensity = pulse_intensity;
        self
    }

    /// Whether the message occupies any space at all.
    ///
    /// An empty model message is only shown while it is being generated.
    pub fn is_visible(message: &ChatMessage, is_streaming: bool) -> bool {
        !(message.role == Role::Model && message.content.is_empty() && !is_streaming)
    }

    /// Calculate the height required for this message given a width.
    pub fn calculate_height(message: &ChatMessage, width: u16, is_streaming: bool) -> u16 {
        if !Self::is_visible(message, is_streaming) {
            return 0;
        }
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Degenerate case: terminal too narrow for borders + padding.
            // Return 1 row so the message still occupies space in the layout.
            return 1;
        }
        let lines = body_lines(message, content_width, is_streaming).len() as u16;
        lines.max(1) + VERTICAL_OVERHEAD
    }

    pub fn title(message: &ChatMessage, is_streaming: bool) -> &'static str {
        match message.role {
            Role::User => USER_TITLE,
            Role::Model if is_streaming => STREAMING_TITLE,
            Role::Model => RESPONSE_TITLE,
        }
    }
}

fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Green),
        Role::Model => Style::default().fg(Color::Blue),
    }
}

fn body_lines(message: &ChatMessage, content_width: u16, is_streaming: bool) -> Vec<Line<'static>> {
    let style = role_style(message.role);
    match message.role {
        Role::User => content::render_plain(&message.content, content_width, style),
        Role::Model => {
            content::render_model_content(&message.content, content_width, style, is_streaming)
        }
    }
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = role_style(self.message.role);

        // Selection overrides the default dim border
        let mut border_style = if self.is_selected {
            Style::default().fg(Color::Cyan)
        } else {
            style.add_modifier(Modifier::DIM)
        };

        // Three-phase breathing while generating: DIM → normal → BOLD
        if self.pulse_intensity > PULSE_BOLD_THRESHOLD {
            border_style = border_style
                .remove_modifier(Modifier::DIM)
                .add_modifier(Modifier::BOLD);
        } else if self.pulse_intensity > PULSE_NORMAL_THRESHOLD {
            border_style = border_style.remove_modifier(Modifier::DIM);
        }

        let mut block = Block::bordered()
            .title(Self::title(self.message, self.is_streaming))
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        if self.message.role == Role::Model && !self.is_streaming {
            let label = if self.is_copied {
                Line::styled("Copied", Style::default().fg(Color::Green))
            } else {
                Line::styled("Copy", Style::default().fg(Color::DarkGray))
            };
            block = block.title_top(label.right_aligned());
        }

        let inner_area = block.inner(area);
        block.render(area, buf);

        let lines = body_lines(self.message, inner_area.width, self.is_streaming);
        Paragraph::new(Text::from(lines)).render(inner_area, buf);
    }
}

/// `Message` is stateless; `render` delegates to the [`Widget`] implementation.
impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversation::Conversation;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn make_message(role: Role, content: &str) -> ChatMessage {
        let mut conversation = Conversation::new();
        let id = conversation.push(role, content.to_string());
        conversation.get(id).cloned().unwrap()
    }

    fn render_to_string(message: Message<'_>, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                f.render_widget(message, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    // ==========================================================================
    // calculate_height tests
    // ==========================================================================

    #[test]
    fn calculate_height_zero_width_returns_minimum() {
        let message = make_message(Role::User, "Hello world");
        assert_eq!(Message::calculate_height(&message, 0, false), 1);
    }

    #[test]
    fn calculate_height_single_line_fits() {
        let message = make_message(Role::User, "Hello");
        assert_eq!(
            Message::calculate_height(&message, 80, false),
            1 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn whitespace_only_model_message_stays_visible() {
        let message = make_message(Role::Model, "  \n");
        assert!(Message::is_visible(&message, false));
        assert_eq!(
            Message::calculate_height(&message, 80, false),
            1 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_wraps_at_width_boundary() {
        let message = make_message(Role::User, "Hello world");
        // width 9 → content_width = 5: "Hello" | "world"
        assert_eq!(
            Message::calculate_height(&message, 9, false),
            2 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_counts_code_frame() {
        let message = make_message(Role::Model, "a\n```js\nx\n```\nb");
        // a, ╭──, │ x, ╰──, b
        assert_eq!(
            Message::calculate_height(&message, 80, false),
            5 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn empty_model_message_hidden_unless_streaming() {
        let message = make_message(Role::Model, "");
        assert_eq!(Message::calculate_height(&message, 80, false), 0);
        assert_eq!(
            Message::calculate_height(&message, 80, true),
            1 + VERTICAL_OVERHEAD
        );
    }

    // ==========================================================================
    // Rendering
    // ==========================================================================

    #[test]
    fn streaming_message_shows_creating_title_and_cursor() {
        let message = make_message(Role::Model, "Hel");
        let text = render_to_string(Message::new(&message, true), 40, 3);
        assert!(text.contains(STREAMING_TITLE));
        assert!(text.contains(content::STREAMING_CURSOR));
        assert!(!text.contains("Copy"));
    }

    #[test]
    fn finished_message_shows_response_and_copy() {
        let message = make_message(Role::Model, "Hello");
        let text = render_to_string(Message::new(&message, false), 40, 3);
        assert!(text.contains(RESPONSE_TITLE));
        assert!(text.contains("Copy"));
        assert!(!text.contains("Copied"));

        let text = render_to_string(Message::new(&message, false).copied(true), 40, 3);
        assert!(text.contains("Copied"));
    }

    #[test]
    fn user_message_has_no_copy_label() {
        let message = make_message(Role::User, "question");
        let text = render_to_string(Message::new(&message, false), 40, 3);
        assert!(text.contains(USER_TITLE));
        assert!(text.contains("question"));
        assert!(!text.contains("Copy"));
    }

    #[test]
    fn user_fences_are_not_parsed() {
        let message = make_message(Role::User, "```js\nx\n```");
        // Rendered verbatim: three lines plus borders
        assert_eq!(
            Message::calculate_height(&message, 80, false),
            3 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn style_user_is_green_model_is_blue() {
        assert_eq!(role_style(Role::User).fg, Some(Color::Green));
        assert_eq!(role_style(Role::Model).fg, Some(Color::Blue));
    }
}
