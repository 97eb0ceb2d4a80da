//! # Landing Page Component
//!
//! Centered welcome text shown while the conversation is empty.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;
use crate::tui::components::title_bar::PRODUCT_NAME;

pub const TAGLINE: &str = "Illuminate your ideas with next-generation intelligence.";

pub struct LandingPage {
    /// Animation pulse (0.0 to 1.0) for the product name
    pub pulse_value: f32,
}

impl LandingPage {
    pub fn new(pulse_value: f32) -> Self {
        Self { pulse_value }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut name_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        if self.pulse_value < 0.3 {
            name_style = name_style.add_modifier(Modifier::DIM);
        }

        vec![
            Line::from(Span::styled("Introducing", Style::default().fg(Color::DarkGray))),
            Line::from(Span::styled(PRODUCT_NAME, name_style)),
            Line::default(),
            Line::from(Span::styled(
                TAGLINE,
                Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            )),
            Line::from(Span::styled(
                format!("v{}", env!("CARGO_PKG_VERSION")),
                Style::default().fg(Color::DarkGray),
            )),
        ]
    }
}

impl Component for LandingPage {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = self.lines();
        let [text_area] = Layout::vertical([Constraint::Length(lines.len() as u16)])
            .flex(Flex::Center)
            .areas(area);

        let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
        frame.render_widget(paragraph, text_area);
    }
}
