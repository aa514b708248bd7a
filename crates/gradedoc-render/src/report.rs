//! Report rendering entry points and the two-stage fallback chain.

use crate::fallback::fallback_story;
use crate::layout::LayoutEngine;
use crate::pdf::write_pdf;
use crate::style::{PageGeometry, PageSize, StyleSheet};
use gradedoc_core::{assemble, Labels, Language, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Options for [`ReportRenderer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RenderOptions {
    /// Wording of the report.
    ///
    /// Default: French.
    pub language: Language,

    /// Paper size.
    ///
    /// Default: letter.
    pub page_size: PageSize,
}

/// Result of [`ReportRenderer::render_with_fallback`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderOutcome {
    pub path: PathBuf,
    /// `true` when the structured report failed and the plain dump was written.
    pub used_fallback: bool,
}

/// Renders grading data to PDF files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ReportRenderer {
    options: RenderOptions,
}

impl ReportRenderer {
    /// Create a renderer with default options
    #[inline]
    #[must_use = "creates renderer with default options"]
    pub const fn new() -> Self {
        Self {
            options: RenderOptions {
                language: Language::Fr,
                page_size: PageSize::Letter,
            },
        }
    }

    /// Create a renderer with custom options
    #[inline]
    #[must_use = "creates renderer with custom options"]
    pub const fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    #[inline]
    #[must_use]
    pub const fn options(&self) -> &RenderOptions {
        &self.options
    }

    #[must_use]
    pub const fn labels(&self) -> Labels {
        Labels::for_language(self.options.language)
    }

    fn engine(&self) -> LayoutEngine {
        LayoutEngine::new(
            PageGeometry::new(self.options.page_size),
            StyleSheet::default(),
        )
    }

    /// Structured report as PDF bytes.
    ///
    /// # Errors
    ///
    /// [`gradedoc_core::ReportError::InputShape`] for unusable input, or a
    /// render failure (malformed content, markup, PDF encoding).
    pub fn render_bytes(&self, input: &Value) -> Result<Vec<u8>> {
        let document = assemble(input, &self.labels())?;
        let engine = self.engine();
        let pages = engine.layout(document)?;
        write_pdf(&pages, engine.geometry())
    }

    /// Plain-text fallback report as PDF bytes.
    ///
    /// # Errors
    ///
    /// Only PDF encoding errors; any JSON value is accepted.
    pub fn fallback_bytes(&self, input: &Value) -> Result<Vec<u8>> {
        let engine = self.engine();
        let story = fallback_story(input, &self.labels(), engine.geometry())?;
        let pages = engine.flow(&story);
        write_pdf(&pages, engine.geometry())
    }

    /// Render the structured report to `destination`, creating parent
    /// directories, and return the destination.
    ///
    /// # Errors
    ///
    /// Same as [`Self::render_bytes`], plus I/O errors.
    pub fn render(&self, input: &Value, destination: impl AsRef<Path>) -> Result<PathBuf> {
        let destination = destination.as_ref();
        let bytes = self.render_bytes(input)?;
        write_output(destination, &bytes)
    }

    /// Render the plain-text fallback report to `destination`.
    ///
    /// # Errors
    ///
    /// I/O errors, or PDF encoding errors.
    pub fn render_fallback(
        &self,
        input: &Value,
        destination: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        let destination = destination.as_ref();
        let bytes = self.fallback_bytes(input)?;
        write_output(destination, &bytes)
    }

    /// Render the structured report, falling back to the plain dump when it
    /// fails with a render failure.
    ///
    /// Input shape errors are not render failures and are returned as is.
    ///
    /// # Errors
    ///
    /// Input shape errors, or errors of the fallback itself.
    pub fn render_with_fallback(
        &self,
        input: &Value,
        destination: impl AsRef<Path>,
    ) -> Result<RenderOutcome> {
        let destination = destination.as_ref();
        match self.render(input, destination) {
            Ok(path) => Ok(RenderOutcome {
                path,
                used_fallback: false,
            }),
            Err(error) if error.is_render_failure() => {
                log::warn!("structured report failed ({error}), writing plain fallback");
                let path = self.render_fallback(input, destination)?;
                Ok(RenderOutcome {
                    path,
                    used_fallback: true,
                })
            }
            Err(error) => Err(error),
        }
    }
}

fn write_output(destination: &Path, bytes: &[u8]) -> Result<PathBuf> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(destination, bytes)?;
    log::info!("wrote {} ({} bytes)", destination.display(), bytes.len());
    Ok(destination.to_path_buf())
}
