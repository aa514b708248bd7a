//! Markdown serialization for `ReportDocument`.
//!
//! Markup runs become `**bold**` / `*italic*`; literal text is escaped so the
//! output never turns user content into markdown or HTML.
//!
//! # Examples
//!
//! ```rust
//! use gradedoc_core::{assemble, Labels, MarkdownSerializer};
//! use serde_json::json;
//!
//! let doc = assemble(&json!({"question_id": "Q1", "topic": "Limits"}), &Labels::english())?;
//! let markdown = MarkdownSerializer::new().serialize(&doc)?;
//! assert!(markdown.starts_with("# AI-Generated Grading Report"));
//! assert!(markdown.contains("## Question: Q1"));
//! # Ok::<(), gradedoc_core::ReportError>(())
//! ```

use crate::document::{BreakdownTable, ReportDocument, Section};
use crate::error::Result;
use crate::markup::{parse_markup, plain_text, TextRun};
use unicode_width::UnicodeWidthStr;

/// Configuration options for markdown serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkdownOptions {
    /// Escape `&`, `<` and `>` as HTML entities.
    ///
    /// Default: `true`.
    pub escape_html: bool,

    /// Escape markdown emphasis characters (`*`, `_`) in literal text.
    ///
    /// Default: `true`.
    pub escape_emphasis: bool,
}

impl Default for MarkdownOptions {
    #[inline]
    fn default() -> Self {
        Self {
            escape_html: true,
            escape_emphasis: true,
        }
    }
}

/// Markdown serializer for `ReportDocument`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MarkdownSerializer {
    options: MarkdownOptions,
}

impl MarkdownSerializer {
    /// Create a new markdown serializer with default options
    #[inline]
    #[must_use = "creates serializer with default options"]
    pub const fn new() -> Self {
        Self {
            options: MarkdownOptions {
                escape_html: true,
                escape_emphasis: true,
            },
        }
    }

    /// Create a new markdown serializer with custom options
    #[inline]
    #[must_use = "creates serializer with custom options"]
    pub const fn with_options(options: MarkdownOptions) -> Self {
        Self { options }
    }

    /// Serialize a `ReportDocument` to markdown
    ///
    /// # Errors
    ///
    /// Returns a markup error if any text in the document is malformed markup.
    pub fn serialize(&self, doc: &ReportDocument) -> Result<String> {
        let mut parts = vec![format!("# {}", self.inline(&doc.title)?)];
        for section in &doc.sections {
            self.serialize_section(section, &mut parts)?;
        }
        let mut result = parts.join("\n\n");
        result.push('\n');
        Ok(result)
    }

    fn serialize_section(&self, section: &Section, parts: &mut Vec<String>) -> Result<()> {
        parts.push(format!("## {}", self.inline(&section.header)?));

        let info = section
            .info
            .iter()
            .map(|row| {
                Ok(format!(
                    "- **{}** {}",
                    self.inline(&row.label)?,
                    self.inline(&row.value)?
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        parts.push(info.join("\n"));

        parts.push(format!("### {}", self.inline(&section.answer_heading)?));
        for paragraph in &section.answer {
            parts.push(self.inline(paragraph)?);
        }

        if let Some(table) = &section.breakdown {
            parts.push(format!("### {}", self.inline(&table.heading)?));
            parts.push(self.serialize_table(table)?);
        }

        parts.push(format!("### {}", self.inline(&section.feedback_heading)?));
        parts.push(self.inline(&section.feedback)?);
        Ok(())
    }

    /// GitHub-style table, columns padded to their display width.
    fn serialize_table(&self, table: &BreakdownTable) -> Result<String> {
        let header = table
            .header
            .iter()
            .map(|cell| Ok(self.escape(&plain_text(cell)?)))
            .collect::<Result<Vec<_>>>()?;
        let rows = table
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| Ok(self.inline(cell)?.replace('|', "\\|")))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        let mut widths: Vec<usize> = header.iter().map(|cell| cell.width().max(3)).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.width());
            }
        }

        let format_row = |cells: &[String]| {
            let padded: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| {
                    let pad = width.saturating_sub(cell.width());
                    format!("{cell}{}", " ".repeat(pad))
                })
                .collect();
            format!("| {} |", padded.join(" | "))
        };

        let mut lines = vec![format_row(&header)];
        let separator: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
        lines.push(format!("| {} |", separator.join(" | ")));
        for row in &rows {
            lines.push(format_row(row));
        }
        Ok(lines.join("\n"))
    }

    /// Convert a markup string to inline markdown on a single line.
    fn inline(&self, markup: &str) -> Result<String> {
        let runs = parse_markup(markup)?;
        Ok(runs
            .iter()
            .map(|run| self.run_to_markdown(run))
            .collect::<String>()
            .replace(['\r', '\n'], " "))
    }

    fn run_to_markdown(&self, run: &TextRun) -> String {
        let text = self.escape(&run.text);
        if text.trim().is_empty() {
            return text;
        }
        match (run.bold, run.italic) {
            (true, true) => format!("***{text}***"),
            (true, false) => format!("**{text}**"),
            (false, true) => format!("*{text}*"),
            (false, false) => text,
        }
    }

    fn escape(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len() + 8);
        for ch in text.chars() {
            match ch {
                '&' if self.options.escape_html => result.push_str("&amp;"),
                '<' if self.options.escape_html => result.push_str("&lt;"),
                '>' if self.options.escape_html => result.push_str("&gt;"),
                '*' | '_' if self.options.escape_emphasis => {
                    result.push('\\');
                    result.push(ch);
                }
                _ => result.push(ch),
            }
        }
        result
    }
}
