//! Minimal rich-text markup.
//!
//! Text in a [`crate::ReportDocument`] is markup: bold (`<b>`), italic
//! (`<i>`) and the five XML entities. User-controlled text must go through
//! [`escape_markup`] before it is embedded, otherwise an answer such as
//! `<b>cheat</b>` would be rendered bold, and a bare `&` would fail to parse.

use crate::error::{ReportError, Result};
use serde::Serialize;

/// A run of text sharing one style.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

/// Escape the three reserved markup characters.
///
/// `&` becomes `&amp;`, `<` becomes `&lt;`, `>` becomes `&gt;`. Quotes are
/// left alone: they carry no meaning outside tags.
#[must_use]
pub fn escape_markup(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(ch),
        }
    }
    result
}

/// Wrap already-escaped markup in a bold tag.
#[inline]
#[must_use]
pub fn bold(markup: &str) -> String {
    format!("<b>{markup}</b>")
}

/// Parse markup into styled runs.
///
/// Adjacent text with the same style is merged into one run. Empty input
/// gives no runs.
///
/// # Errors
///
/// Returns [`ReportError::Markup`] for unknown or unbalanced tags, an
/// unterminated tag or entity, an unknown entity, or a stray `>`.
pub fn parse_markup(markup: &str) -> Result<Vec<TextRun>> {
    let mut runs: Vec<TextRun> = Vec::new();
    let mut bold_depth = 0usize;
    let mut italic_depth = 0usize;
    let mut rest = markup;

    while let Some(ch) = rest.chars().next() {
        match ch {
            '<' => {
                let end = rest
                    .find('>')
                    .ok_or_else(|| markup_error("unterminated tag", rest))?;
                let tag = &rest[1..end];
                match tag {
                    "b" => bold_depth += 1,
                    "i" => italic_depth += 1,
                    "/b" => {
                        bold_depth = bold_depth
                            .checked_sub(1)
                            .ok_or_else(|| markup_error("unbalanced </b>", rest))?;
                    }
                    "/i" => {
                        italic_depth = italic_depth
                            .checked_sub(1)
                            .ok_or_else(|| markup_error("unbalanced </i>", rest))?;
                    }
                    _ => return Err(markup_error("unknown tag", &rest[..=end])),
                }
                rest = &rest[end + 1..];
            }
            '&' => {
                let end = rest
                    .find(';')
                    .ok_or_else(|| markup_error("unterminated entity", rest))?;
                let decoded = match &rest[1..end] {
                    "amp" => '&',
                    "lt" => '<',
                    "gt" => '>',
                    "quot" => '"',
                    "apos" => '\'',
                    _ => return Err(markup_error("unknown entity", &rest[..=end])),
                };
                push_char(&mut runs, decoded, bold_depth > 0, italic_depth > 0);
                rest = &rest[end + 1..];
            }
            '>' => return Err(markup_error("stray '>'", rest)),
            _ => {
                push_char(&mut runs, ch, bold_depth > 0, italic_depth > 0);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }

    if bold_depth > 0 || italic_depth > 0 {
        return Err(ReportError::Markup(format!(
            "unclosed tag in {:?}",
            truncate(markup)
        )));
    }

    Ok(runs)
}

/// Plain text of a markup string, with tags dropped and entities decoded.
///
/// # Errors
///
/// Same as [`parse_markup`].
pub fn plain_text(markup: &str) -> Result<String> {
    Ok(parse_markup(markup)?
        .into_iter()
        .map(|run| run.text)
        .collect())
}

fn push_char(runs: &mut Vec<TextRun>, ch: char, bold: bool, italic: bool) {
    match runs.last_mut() {
        Some(last) if last.bold == bold && last.italic == italic => last.text.push(ch),
        _ => runs.push(TextRun {
            text: ch.to_string(),
            bold,
            italic,
        }),
    }
}

fn markup_error(what: &str, at: &str) -> ReportError {
    ReportError::Markup(format!("{what} at {:?}", truncate(at)))
}

fn truncate(text: &str) -> String {
    text.chars().take(40).collect()
}
