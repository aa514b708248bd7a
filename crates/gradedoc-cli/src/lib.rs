//! Command-line interface for gradedoc
//!
//! This crate provides the `gradedoc` command-line tool, which turns grading
//! data produced by a language model into a PDF report.
//!
//! # Quick Start
//!
//! ```bash
//! # Render a grading result to reports/report.pdf
//! gradedoc render grading.json
//!
//! # English wording, A4 paper, explicit output
//! gradedoc render grading.json --lang en --page-size a4 -o out/report.pdf
//!
//! # Markdown instead of PDF, on stdout
//! gradedoc render grading.json -f markdown
//!
//! # Show how the input keys were interpreted
//! gradedoc inspect grading.json
//!
//! # Full pipeline: rubric extraction, grading and report
//! gradedoc correct --exam exam.txt --student copy.txt --generator my-llm-wrapper
//! ```
//!
//! # Configuration
//!
//! `.gradedoc.toml` files in the home and the current directory provide
//! defaults; see [`config`]. `gradedoc config init` writes a commented
//! template.

pub mod config;
pub mod pipeline;

pub use config::Config;
pub use pipeline::{
    correct, grading_prompt, parse_generated, rubric_prompt, CommandGenerator, CorrectionOutcome,
    StructuredGenerator,
};
