//! Report serialization module
//!
//! Text serializers for a [`crate::ReportDocument`]. The PDF renderer lives in
//! the `gradedoc-render` crate.

pub mod json;
pub mod markdown;

pub use json::{JsonOptions, JsonSerializer};
pub use markdown::{MarkdownOptions, MarkdownSerializer};
