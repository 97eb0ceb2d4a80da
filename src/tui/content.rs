//! Message content → ratatui `Line`s.
//!
//! Turns the segments from [`parse_segments`] into pre-wrapped, styled lines.
//! Prose is wrapped with `textwrap`; fenced code is framed and highlighted
//! with syntect. Because wrapping happens here, the number of returned lines
//! is exactly the rendered height, so the message list can measure a message
//! without drawing it.

use std::sync::LazyLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::core::content::{Segment, parse_segments};

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const THEME: &str = "base16-ocean.dark";
/// Appended to the live message while it is being generated.
pub const STREAMING_CURSOR: &str = "▍";

fn border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Wrapping options shared by every prose renderer in the TUI.
pub fn wrap_options(width: usize) -> textwrap::Options<'static> {
    textwrap::Options::new(width)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Renders model content: prose paragraphs and framed code blocks.
pub fn render_model_content(
    content: &str,
    width: u16,
    base: Style,
    streaming: bool,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for segment in parse_segments(content.trim_end()) {
        match &segment {
            Segment::Prose(text) => lines.extend(prose_lines(text, width, base)),
            Segment::Code { language, body } => {
                let label = segment.code_label().unwrap_or("code");
                lines.extend(code_lines(label, language.as_deref(), body));
            }
        }
    }
    if streaming {
        append_cursor(&mut lines, base);
    }
    lines
}

/// Renders text verbatim as wrapped prose, without looking for fences.
pub fn render_plain(content: &str, width: u16, base: Style) -> Vec<Line<'static>> {
    prose_lines(content.trim_end(), width, base)
}

fn prose_lines(text: &str, width: u16, style: Style) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    let options = wrap_options(width);
    let text = expand_tabs(text);
    text.split('\n')
        .flat_map(|logical| {
            let logical = logical.trim_end_matches('\r');
            textwrap::wrap(logical, &options)
                .into_iter()
                .map(|wrapped| Line::from(Span::styled(wrapped.into_owned(), style)))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn code_lines(label: &str, language: Option<&str>, body: &str) -> Vec<Line<'static>> {
    let bs = border_style();
    let mut lines = vec![Line::from(vec![
        Span::styled("╭── ", bs),
        Span::styled(label.to_owned(), bs.add_modifier(Modifier::BOLD)),
        Span::styled(" ──", bs),
    ])];

    let mut highlighter = language
        .and_then(|lang| SYNTAX_SET.find_syntax_by_token(lang))
        .zip(THEME_SET.themes.get(THEME))
        .map(|(syntax, theme)| HighlightLines::new(syntax, theme));

    let body = expand_tabs(body);
    for source_line in LinesWithEndings::from(&body) {
        let mut spans = vec![Span::styled("│ ", bs)];
        let highlighted = highlighter
            .as_mut()
            .and_then(|hl| hl.highlight_line(source_line, &SYNTAX_SET).ok());
        match highlighted {
            Some(ranges) => spans.extend(ranges.into_iter().filter_map(|(hl_style, frag)| {
                let content = frag.trim_end_matches(['\n', '\r']);
                if content.is_empty() {
                    return None;
                }
                let fg = Color::Rgb(
                    hl_style.foreground.r,
                    hl_style.foreground.g,
                    hl_style.foreground.b,
                );
                Some(Span::styled(content.to_owned(), Style::default().fg(fg)))
            })),
            None => spans.push(Span::styled(
                source_line.trim_end_matches(['\n', '\r']).to_owned(),
                Style::default().fg(Color::White),
            )),
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(Span::styled("╰──", bs)));
    lines
}

fn append_cursor(lines: &mut Vec<Line<'static>>, style: Style) {
    let cursor = Span::styled(STREAMING_CURSOR, style.add_modifier(Modifier::SLOW_BLINK));
    match lines.last_mut() {
        Some(line) => line.push_span(cursor),
        None => lines.push(Line::from(cursor)),
    }
}

/// Ratatui renders `\t` as zero-width.
fn expand_tabs(text: &str) -> String {
    text.replace('\t', "    ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect()
    }

    #[test]
    fn prose_code_prose_layout() {
        let lines = render_model_content(
            "a\n```js\nconsole.log(1)\n```\nb",
            40,
            Style::default(),
            false,
        );
        let text = plain(&lines);
        assert_eq!(text[0], "a");
        assert_eq!(text[1], "╭── js ──");
        assert!(text[2].starts_with("│ "));
        assert!(text[2].contains("console.log(1)"));
        assert_eq!(text[3], "╰──");
        assert_eq!(text[4], "b");
        assert_eq!(text.len(), 5);
    }

    #[test]
    fn untagged_block_labelled_code() {
        let text = plain(&render_model_content("```\nx\n```", 40, Style::default(), false));
        assert_eq!(text[0], "╭── code ──");
        assert_eq!(text[1], "│ x");
    }

    #[test]
    fn unknown_language_renders_plain_body() {
        let lines = render_model_content("```nosuchlang\nraw\n```", 40, Style::default(), false);
        let body = &lines[1];
        assert_eq!(body.spans[1].content, "raw");
        assert_eq!(body.spans[1].style.fg, Some(Color::White));
    }

    #[test]
    fn prose_wraps_to_width() {
        let lines = render_plain("Hello world", 5, Style::default());
        assert_eq!(plain(&lines), vec!["Hello", "world"]);
    }

    #[test]
    fn prose_keeps_blank_lines() {
        let lines = render_plain("one\n\ntwo", 40, Style::default());
        assert_eq!(plain(&lines), vec!["one", "", "two"]);
    }

    #[test]
    fn streaming_cursor_appended() {
        let lines = render_model_content("Hi", 40, Style::default(), true);
        assert_eq!(plain(&lines), vec![format!("Hi{STREAMING_CURSOR}")]);

        let empty = render_model_content("", 40, Style::default(), true);
        assert_eq!(plain(&empty), vec![STREAMING_CURSOR.to_string()]);
    }

    #[test]
    fn half_written_block_stays_prose_while_streaming() {
        let lines = render_model_content("```rust\nfn main", 40, Style::default(), true);
        let text = plain(&lines);
        assert_eq!(text[0], "```rust");
        assert!(text[1].starts_with("fn main"));
    }

    #[test]
    fn tabs_expanded_to_spaces() {
        let lines = render_model_content("```\n\tindented\n```", 40, Style::default(), false);
        let text = plain(&lines);
        assert_eq!(text[1], "│     indented");
    }

    #[test]
    fn known_language_is_highlighted() {
        let lines = render_model_content("```rust\nfn main() {}\n```", 40, Style::default(), false);
        let colored = lines[1]
            .spans
            .iter()
            .skip(1)
            .all(|s| matches!(s.style.fg, Some(Color::Rgb(..))));
        assert!(colored);
    }
}
