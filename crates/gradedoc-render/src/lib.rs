//! # gradedoc render - paginated PDF output
//!
//! Lays out a [`gradedoc_core::ReportDocument`] on letter or A4 pages with
//! the base-14 Helvetica faces and writes it with `lopdf`. When the
//! structured layout fails, [`ReportRenderer::render_with_fallback`] writes a
//! plain dump of the input instead, so a caller always gets a file.
//!
//! ```rust,no_run
//! use gradedoc_render::ReportRenderer;
//! use serde_json::json;
//!
//! let input = json!({"question_id": "Q1", "max_points": 10, "student_score": 7});
//! let outcome = ReportRenderer::new().render_with_fallback(&input, "reports/report.pdf")?;
//! assert!(!outcome.used_fallback);
//! # Ok::<(), gradedoc_core::ReportError>(())
//! ```

pub mod fallback;
pub mod fonts;
pub mod layout;
pub mod pdf;
pub mod report;
pub mod style;
pub mod wrap;

pub use fallback::{fallback_score, fallback_story};
pub use fonts::FontFace;
pub use layout::{Block, DrawOp, LayoutEngine, Page, Paginator, TableBlock};
pub use pdf::write_pdf;
pub use report::{RenderOptions, RenderOutcome, ReportRenderer};
pub use style::{PageGeometry, PageSize, StyleSheet};
