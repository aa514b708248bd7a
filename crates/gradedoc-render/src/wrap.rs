//! Greedy word wrapping of styled text runs.
//!
//! Whitespace collapses to single spaces the way it does in HTML. Words wider
//! than the available width are broken between characters.

use crate::fonts::{text_width, FontFace};
use gradedoc_core::TextRun;

/// A piece of a line drawn with one face.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub face: FontFace,
}

/// One wrapped line and its width in points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub spans: Vec<Span>,
    pub width: f32,
}

impl Line {
    #[must_use]
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    fn push(&mut self, text: &str, face: FontFace, size: f32) {
        if text.is_empty() {
            return;
        }
        self.width += text_width(text, face, size);
        match self.spans.last_mut() {
            Some(last) if last.face == face => last.text.push_str(text),
            _ => self.spans.push(Span {
                text: text.to_string(),
                face,
            }),
        }
    }

    fn push_spans(&mut self, spans: &[Span], size: f32) {
        for span in spans {
            self.push(&span.text, span.face, size);
        }
    }

    fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// Split runs into words; a word may change face mid-way.
fn words(runs: &[TextRun], base: FontFace) -> Vec<Vec<Span>> {
    let mut words = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    for run in runs {
        let face = base.with_style(run.bold, run.italic);
        for ch in run.text.chars() {
            if ch.is_whitespace() {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                continue;
            }
            match current.last_mut() {
                Some(span) if span.face == face => span.text.push(ch),
                _ => current.push(Span {
                    text: ch.to_string(),
                    face,
                }),
            }
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn spans_width(spans: &[Span], size: f32) -> f32 {
    spans
        .iter()
        .map(|span| text_width(&span.text, span.face, size))
        .sum()
}

/// Wrap `runs` into lines no wider than `max_width`.
///
/// Returns no lines for text that is empty or all whitespace.
#[must_use]
pub fn wrap_runs(runs: &[TextRun], base: FontFace, size: f32, max_width: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut line = Line::default();

    for word in words(runs, base) {
        let width = spans_width(&word, size);
        if !line.is_empty() {
            let space_face = line.spans.last().map_or(base, |span| span.face);
            let space = text_width(" ", space_face, size);
            if line.width + space + width <= max_width {
                line.push(" ", space_face, size);
                line.push_spans(&word, size);
                continue;
            }
            lines.push(std::mem::take(&mut line));
        }

        if width <= max_width {
            line.push_spans(&word, size);
        } else {
            break_word(&word, size, max_width, &mut lines, &mut line);
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Break an over-long word; the last chunk stays open in `line`.
fn break_word(word: &[Span], size: f32, max_width: f32, lines: &mut Vec<Line>, line: &mut Line) {
    for span in word {
        for ch in span.text.chars() {
            let mut buf = [0u8; 4];
            let piece = ch.encode_utf8(&mut buf);
            let width = text_width(piece, span.face, size);
            if !line.is_empty() && line.width + width > max_width {
                lines.push(std::mem::take(line));
            }
            line.push(piece, span.face, size);
        }
    }
}

/// Wrap plain text, keeping hard line breaks and leading indentation.
///
/// Used for the fallback dump, where JSON indentation matters.
#[must_use]
pub fn wrap_preformatted(text: &str, face: FontFace, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for raw in text.lines() {
        let raw = raw.replace('\t', "    ");
        if raw.is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        let mut width = 0.0;
        for ch in raw.chars() {
            let mut buf = [0u8; 4];
            let ch_width = text_width(ch.encode_utf8(&mut buf), face, size);
            if !current.is_empty() && width + ch_width > max_width {
                lines.push(std::mem::take(&mut current));
                width = 0.0;
            }
            current.push(ch);
            width += ch_width;
        }
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradedoc_core::parse_markup;

    fn wrap(markup: &str, max_width: f32) -> Vec<Line> {
        wrap_runs(&parse_markup(markup).unwrap(), FontFace::Regular, 10.0, max_width)
    }

    #[test]
    fn test_single_line() {
        let lines = wrap("hello   world", 500.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "hello world");
    }

    #[test]
    fn test_wraps_at_width() {
        let lines = wrap("aaa bbb ccc ddd", 40.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.width <= 40.0, "{line:?}");
        }
        let joined: Vec<String> = lines.iter().map(Line::text).collect();
        assert_eq!(joined.join(" "), "aaa bbb ccc ddd");
    }

    #[test]
    fn test_long_word_is_broken() {
        let word = "x".repeat(200);
        let lines = wrap(&word, 100.0);
        assert!(lines.len() > 1);
        let total: usize = lines.iter().map(|l| l.text().len()).sum();
        assert_eq!(total, 200);
        assert!(lines.iter().all(|l| l.width <= 100.0));
    }

    #[test]
    fn test_styled_spans() {
        let lines = wrap("plain <b>bold</b> <i>it</i>", 500.0);
        let faces: Vec<FontFace> = lines[0].spans.iter().map(|s| s.face).collect();
        assert_eq!(
            faces,
            vec![FontFace::Regular, FontFace::Bold, FontFace::Oblique]
        );
        assert_eq!(lines[0].text(), "plain bold it");
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(wrap("", 100.0).is_empty());
        assert!(wrap("   ", 100.0).is_empty());
    }

    #[test]
    fn test_preformatted_keeps_indentation() {
        let lines = wrap_preformatted("{\n  \"a\": 1\n}", FontFace::Regular, 8.0, 400.0);
        assert_eq!(lines, vec!["{", "  \"a\": 1", "}"]);
    }
}
