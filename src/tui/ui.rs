use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{LandingPage, MessageList, TitleBar};
use crate::tui::content;
use crate::tui::{InputMode, TuiState};

/// Screen regions, top to bottom.
pub struct Areas {
    pub title: Rect,
    pub main: Rect,
    pub error: Rect,
    pub input: Rect,
    pub footer: Rect,
}

/// Height of the error banner for `error` at `width`, including borders.
pub fn error_height(error: Option<&str>, width: u16) -> u16 {
    let Some(error) = error else {
        return 0;
    };
    let inner = usize::from(width.saturating_sub(2).max(1));
    let lines = textwrap::wrap(error, content::wrap_options(inner)).len() as u16;
    lines.clamp(1, 3) + 2
}

pub fn layout(frame_area: Rect, app: &App, tui: &TuiState) -> Areas {
    use Constraint::{Length, Min};

    let input_height = tui.input_box.calculate_height(frame_area.width);
    let error_height = error_height(app.error.as_deref(), frame_area.width);
    let [title, main, error, input, footer] = Layout::vertical([
        Length(1),
        Min(0),
        Length(error_height),
        Length(input_height),
        Length(1),
    ])
    .areas(frame_area);

    Areas {
        title,
        main,
        error,
        input,
        footer,
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    let areas = layout(frame.area(), app, tui);

    // Main area: welcome text or the conversation
    if app.conversation.is_empty() {
        LandingPage::new(tui.pulse_value).render(frame, areas.main);
    } else {
        let copied = tui
            .copy_notice
            .as_ref()
            .and_then(|notice| notice.active_message(&app.conversation, Instant::now()));
        MessageList::new(
            &mut tui.message_list,
            app.conversation.messages(),
            app.streaming_message(),
            copied,
            tui.pulse_value,
        )
        .render(frame, areas.main);
    }

    // Title bar (after the list so the unseen-content flag is current)
    TitleBar::new(
        app.status_message.clone(),
        app.is_streaming(),
        tui.message_list.has_unseen_content && !app.conversation.is_empty(),
    )
    .render(frame, areas.title);

    if let Some(error) = &app.error {
        draw_error_banner(frame, areas.error, error);
    }

    tui.input_box.render(frame, areas.input);

    frame.render_widget(footer_hints(app, tui.input_mode), areas.footer);
}

fn draw_error_banner(frame: &mut Frame, area: Rect, error: &str) {
    let style = Style::default().fg(Color::Red);
    let banner = Paragraph::new(error.to_string())
        .style(style)
        .wrap(Wrap { trim: true })
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(style)
                .title(Span::styled("Error", style.add_modifier(Modifier::BOLD))),
        );
    frame.render_widget(banner, area);
}

fn footer_hints(app: &App, mode: InputMode) -> Line<'static> {
    let hints = match mode {
        _ if app.is_streaming() => "Esc cancel · PgUp/PgDn scroll · Ctrl+C quit",
        InputMode::Input => {
            "Enter send · Shift+Enter newline · Ctrl+Y copy · Ctrl+L clear · Esc browse · Ctrl+C quit"
        }
        InputMode::Cursor => "↑/↓ select · y copy · Enter edit · Ctrl+C quit",
    };
    Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray)))
}

/// Hit test: given a screen Y coordinate, find which message index (if any) is at that position
pub fn hit_test_message(
    screen_y: u16,
    main_area: Rect,
    scroll_offset_y: u16,
    prefix_heights: &[u16],
) -> Option<usize> {
    if screen_y < main_area.y || screen_y >= main_area.y + main_area.height {
        return None;
    }

    // Convert screen Y to content Y (accounting for scroll)
    let content_y = (screen_y - main_area.y) + scroll_offset_y;

    // prefix_heights[i] is the bottom edge of message i; hidden messages share edges
    let index = prefix_heights.partition_point(|&bottom| bottom <= content_y);
    (index < prefix_heights.len()).then_some(index)
}
