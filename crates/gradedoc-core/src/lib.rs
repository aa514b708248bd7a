//! # gradedoc core - schema-less grading data to report model
//!
//! Grading data produced by a language model rarely follows one schema: the
//! question id may be `question_id`, `q_id` or `QuestionNumber`, the rubric
//! may live under `grading_breakdown` or `evaluation_criteria`. This crate
//! infers the role of each field from its name and builds a canonical
//! [`ReportDocument`] that the `gradedoc-render` crate lays out as a PDF.
//!
//! ## Quick Start
//!
//! ```rust
//! use gradedoc_core::{assemble, Labels};
//! use serde_json::json;
//!
//! let input = json!([{
//!     "q_id": "P1",
//!     "subject_area": "Math",
//!     "max_marks": 10,
//!     "final_score": 5,
//!     "response": "ans",
//!     "general_comments": "ok"
//! }]);
//!
//! let doc = assemble(&input, &Labels::english())?;
//! assert_eq!(doc.sections.len(), 1);
//! assert_eq!(doc.sections[0].header, "Question: P1");
//! # Ok::<(), gradedoc_core::ReportError>(())
//! ```
//!
//! ## Pipeline
//!
//! 1. [`normalize_input`] - accept `{"corrections": [...]}`, a list, or a single record
//! 2. [`classify`] - map key names of the first record to [`KeyCategory`] roles
//! 3. [`extract`] - resolve [`CanonicalQuestionInfo`] with typed fallbacks
//! 4. [`analyze`] - find the columns of the rubric breakdown
//! 5. [`assemble`] - build the escaped, immutable [`ReportDocument`]
//!
//! ## Module Organization
//!
//! - [`value`] - tagged view over raw JSON values
//! - [`classifier`] - key-role classification
//! - [`extractor`] - canonical field extraction
//! - [`breakdown`] - rubric breakdown analysis
//! - [`document`] - report model and assembly
//! - [`markup`] - escaping and the rich-text mini-markup
//! - [`labels`] - report wording (French default, English)
//! - [`inspect`] - diagnostics for `gradedoc inspect`
//! - [`serializer`] - Markdown and JSON output
//! - [`error`] - error types

pub mod breakdown;
pub mod classifier;
pub mod document;
pub mod error;
pub mod extractor;
pub mod inspect;
pub mod labels;
pub mod markup;
pub mod serializer;
pub mod value;

// Re-exports for convenience
pub use breakdown::{analyze, find_key_by_type, BreakdownColumns, BreakdownField, BreakdownStructure};
pub use classifier::{classify, KeyCategory, KeyRoles};
pub use document::*;
pub use error::*;
pub use extractor::{extract, find_numeric, CanonicalQuestionInfo};
pub use inspect::{inspect, Inspection, RecordInspection};
pub use labels::{Labels, Language};
pub use markup::{escape_markup, parse_markup, plain_text, TextRun};
pub use serializer::*;
pub use value::{FieldValue, RawRecord};
