//! # Message Content Parsing
//!
//! Splits a model reply into prose and fenced code blocks.
//!
//! ```text
//! "intro\n```rust\nfn main() {}\n```\noutro"
//!     → Prose("intro")
//!     → Code { language: Some("rust"), body: "fn main() {}\n" }
//!     → Prose("outro")
//! ```
//!
//! Fences pair up left to right: an opening ``` is closed by the nearest
//! following ```. A fence without a partner is left in the prose, so a reply
//! that is still streaming renders its half-written block as plain text.

const FENCE: &str = "```";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain text. Whitespace and line breaks are significant.
    Prose(String),
    /// A fenced code block with an optional language tag.
    Code {
        language: Option<String>,
        body: String,
    },
}

impl Segment {
    /// Label shown above a code block. `None` for prose.
    pub fn code_label(&self) -> Option<&str> {
        match self {
            Segment::Prose(_) => None,
            Segment::Code { language, .. } => Some(language.as_deref().unwrap_or("code")),
        }
    }
}

/// Parses `text` into an ordered list of segments. Empty prose is dropped.
pub fn parse_segments(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = text;
    let mut after_fence = false;

    while let Some(open) = rest.find(FENCE) {
        let inner_start = open + FENCE.len();
        let Some(inner_len) = rest[inner_start..].find(FENCE) else {
            break;
        };
        let inner = &rest[inner_start..inner_start + inner_len];

        push_prose(&mut segments, &rest[..open], after_fence, true);
        segments.push(code_block(inner));

        rest = &rest[inner_start + inner_len + FENCE.len()..];
        after_fence = true;
    }

    push_prose(&mut segments, rest, after_fence, false);
    segments
}

/// Builds a code segment from the text between two fences.
///
/// The first line, if there is a line break at all, is the language tag.
fn code_block(inner: &str) -> Segment {
    match inner.find('\n') {
        Some(line_end) => {
            let tag = inner[..line_end].trim();
            Segment::Code {
                language: (!tag.is_empty()).then(|| tag.to_string()),
                body: inner[line_end + 1..].to_string(),
            }
        }
        None => Segment::Code {
            language: None,
            body: inner.to_string(),
        },
    }
}

/// Pushes a prose segment, dropping the line break that belongs to an adjacent fence line.
fn push_prose(segments: &mut Vec<Segment>, text: &str, after_fence: bool, before_fence: bool) {
    let mut prose = text;
    if after_fence {
        prose = prose
            .strip_prefix("\r\n")
            .or_else(|| prose.strip_prefix('\n'))
            .unwrap_or(prose);
    }
    if before_fence {
        prose = prose
            .strip_suffix("\r\n")
            .or_else(|| prose.strip_suffix('\n'))
            .unwrap_or(prose);
    }
    if !prose.is_empty() {
        segments.push(Segment::Prose(prose.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prose(s: &str) -> Segment {
        Segment::Prose(s.to_string())
    }

    fn code(language: Option<&str>, body: &str) -> Segment {
        Segment::Code {
            language: language.map(str::to_string),
            body: body.to_string(),
        }
    }

    #[test]
    fn prose_code_prose() {
        let segments = parse_segments("a\n```js\nconsole.log(1)\n```\nb");
        assert_eq!(
            segments,
            vec![prose("a"), code(Some("js"), "console.log(1)\n"), prose("b")]
        );
    }

    #[test]
    fn plain_text_is_single_prose_segment() {
        let segments = parse_segments("hello\n\n  world  ");
        assert_eq!(segments, vec![prose("hello\n\n  world  ")]);
    }

    #[test]
    fn empty_text_has_no_segments() {
        assert!(parse_segments("").is_empty());
    }

    #[test]
    fn fence_without_language_tag() {
        let segments = parse_segments("```\nplain code\n```");
        assert_eq!(segments, vec![code(None, "plain code\n")]);
        assert_eq!(segments[0].code_label(), Some("code"));
    }

    #[test]
    fn fence_without_line_break_has_no_tag() {
        let segments = parse_segments("run ```ls -la``` now");
        assert_eq!(segments, vec![prose("run "), code(None, "ls -la"), prose(" now")]);
    }

    #[test]
    fn language_tag_is_trimmed() {
        let segments = parse_segments("```  python \r\nprint(1)\n```");
        assert_eq!(segments, vec![code(Some("python"), "print(1)\n")]);
    }

    #[test]
    fn unclosed_fence_stays_prose() {
        let text = "start\n```rust\nfn main() {";
        assert_eq!(parse_segments(text), vec![prose(text)]);
    }

    #[test]
    fn consecutive_blocks_drop_empty_prose_between() {
        let segments = parse_segments("```a\n1\n```\n```b\n2\n```");
        assert_eq!(segments, vec![code(Some("a"), "1\n"), code(Some("b"), "2\n")]);
    }

    #[test]
    fn blank_line_between_blocks_is_kept_once() {
        let segments = parse_segments("```a\n1\n```\n\n\n```b\n2\n```");
        assert_eq!(
            segments,
            vec![code(Some("a"), "1\n"), prose("\n"), code(Some("b"), "2\n")]
        );
    }

    #[test]
    fn third_fence_without_partner_is_prose() {
        let segments = parse_segments("```x``` tail ```");
        assert_eq!(segments, vec![code(None, "x"), prose(" tail ```")]);
    }

    #[test]
    fn empty_fence_pair_is_an_empty_block() {
        assert_eq!(parse_segments("``````"), vec![code(None, "")]);
    }

    #[test]
    fn prose_has_no_code_label() {
        assert_eq!(prose("x").code_label(), None);
        assert_eq!(code(Some("sh"), "").code_label(), Some("sh"));
    }
}
