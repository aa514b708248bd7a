//! Error types for report assembly and rendering.
//!
//! Field-level ambiguity never shows up here: a field that cannot be resolved
//! degrades to its default value inside the extractor. Only shape-level,
//! content-level and I/O-level failures are surfaced.

use thiserror::Error;

/// Error types that can occur while turning grading data into a report.
///
/// # Examples
///
/// ```rust
/// use gradedoc_core::{assemble, Labels, ReportError};
/// use serde_json::json;
///
/// match assemble(&json!(42), &Labels::default()) {
///     Err(ReportError::InputShape(msg)) => assert!(msg.contains("number")),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum ReportError {
    /// The input is neither a mapping nor a sequence, or is empty.
    ///
    /// Fatal: the render is aborted and no fallback report is written.
    #[error("Input shape error: {0}")]
    InputShape(String),

    /// Content that cannot be laid out, such as a record or a breakdown entry
    /// that is not a mapping.
    #[error("Malformed content: {0}")]
    MalformedContent(String),

    /// Rich-text markup that does not parse (unknown tag, stray `&`, ...).
    #[error("Markup error: {0}")]
    Markup(String),

    /// The PDF writer failed to encode or serialize the document.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// File I/O error while creating directories or writing the report.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The text-generation oracle returned something that is not JSON, or
    /// could not be invoked at all.
    #[error("Generation error: {0}")]
    Generation(String),

    /// A correction request is missing one of its inputs.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ReportError {
    /// Whether this error belongs to the layout/pagination stage and should
    /// trigger the plain-text fallback rather than abort the request.
    #[inline]
    #[must_use]
    pub const fn is_render_failure(&self) -> bool {
        matches!(
            self,
            Self::MalformedContent(_) | Self::Markup(_) | Self::Pdf(_) | Self::IoError(_)
        )
    }
}

/// Type alias for [`Result<T, ReportError>`].
pub type Result<T> = std::result::Result<T, ReportError>;
