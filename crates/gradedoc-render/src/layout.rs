//! Flowing a [`ReportDocument`] into fixed-size pages.
//!
//! The document is first turned into a story of [`Block`]s, then the
//! [`Paginator`] places blocks top to bottom in the page frame. Paragraphs
//! break between lines. Table rows move to the next page when they do not
//! fit, and a row taller than a whole frame is split between lines.

use crate::fonts::{text_width, FontFace};
use crate::style::{Align, Color, PageGeometry, ParagraphStyle, StyleSheet, TableStyle};
use crate::wrap::{wrap_runs, Line};
use gradedoc_core::{parse_markup, BreakdownTable, ReportDocument, Result, Section, TextRun};

/// Space above and below a horizontal rule.
const RULE_SPACE: f32 = 6.0;
const RULE_WIDTH: f32 = 0.5;

/// A positioned drawing primitive, in PDF user space (origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        face: FontFace,
        size: f32,
        color: Color,
        text: String,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Color,
    },
}

/// One laid-out page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Text drawn on the page, one string per text op, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableBlock {
    /// Absolute column widths in points.
    pub columns: Vec<f32>,
    pub rows: Vec<Vec<Vec<TextRun>>>,
    /// Whether the first row is a header.
    pub header: bool,
    pub style: TableStyle,
}

/// A unit of the story.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph {
        runs: Vec<TextRun>,
        style: ParagraphStyle,
    },
    /// Lines drawn as given, one per row; empty lines still take space.
    Preformatted {
        lines: Vec<String>,
        style: ParagraphStyle,
    },
    Spacer(f32),
    Rule,
    Table(TableBlock),
}

impl Block {
    /// Parse `markup` into a paragraph.
    ///
    /// # Errors
    ///
    /// Returns a markup error when `markup` does not parse.
    pub fn paragraph(markup: &str, style: ParagraphStyle) -> Result<Self> {
        Ok(Self::Paragraph {
            runs: parse_markup(markup)?,
            style,
        })
    }
}

/// Turns documents into pages.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEngine {
    geometry: PageGeometry,
    sheet: StyleSheet,
}

impl LayoutEngine {
    #[must_use]
    pub const fn new(geometry: PageGeometry, sheet: StyleSheet) -> Self {
        Self { geometry, sheet }
    }

    #[inline]
    #[must_use]
    pub const fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    #[inline]
    #[must_use]
    pub const fn sheet(&self) -> &StyleSheet {
        &self.sheet
    }

    /// Lay out a whole report. The document is consumed.
    ///
    /// # Errors
    ///
    /// Returns a markup error when any text in the document is malformed.
    pub fn layout(&self, document: ReportDocument) -> Result<Vec<Page>> {
        let story = self.story(document)?;
        Ok(self.flow(&story))
    }

    /// Place blocks on pages. Always returns at least one page.
    #[must_use]
    pub fn flow(&self, story: &[Block]) -> Vec<Page> {
        let mut paginator = Paginator::new(self.geometry);
        for block in story {
            paginator.push(block);
        }
        paginator.finish()
    }

    fn story(&self, document: ReportDocument) -> Result<Vec<Block>> {
        let sheet = &self.sheet;
        let mut story = vec![
            Block::paragraph(&document.title, sheet.title)?,
            Block::Spacer(sheet.space_after_title),
        ];
        for section in document.sections {
            self.section_blocks(section, &mut story)?;
            story.push(Block::Spacer(sheet.space_between_sections));
        }
        Ok(story)
    }

    fn section_blocks(&self, section: Section, story: &mut Vec<Block>) -> Result<()> {
        let sheet = &self.sheet;
        story.push(Block::paragraph(&section.header, sheet.heading)?);

        let info_rows = section
            .info
            .iter()
            .map(|row| Ok(vec![parse_markup(&row.label)?, parse_markup(&row.value)?]))
            .collect::<Result<Vec<_>>>()?;
        story.push(Block::Table(TableBlock {
            columns: self.columns(&sheet.info_columns),
            rows: info_rows,
            header: false,
            style: sheet.info_table.clone(),
        }));
        story.push(Block::Spacer(sheet.space_after_block));
        story.push(Block::Rule);

        story.push(Block::paragraph(&section.answer_heading, sheet.subheading)?);
        for paragraph in &section.answer {
            story.push(Block::paragraph(paragraph, sheet.body)?);
        }
        story.push(Block::Spacer(sheet.space_after_block));
        story.push(Block::Rule);

        if let Some(table) = section.breakdown {
            story.push(Block::paragraph(&table.heading, sheet.heading)?);
            story.push(Block::Table(self.breakdown_block(table)?));
            story.push(Block::Spacer(sheet.space_after_block));
            story.push(Block::Rule);
        }

        story.push(Block::paragraph(&section.feedback_heading, sheet.subheading)?);
        story.push(Block::paragraph(&section.feedback, sheet.body)?);
        Ok(())
    }

    fn breakdown_block(&self, table: BreakdownTable) -> Result<TableBlock> {
        let mut rows = Vec::with_capacity(table.rows.len() + 1);
        rows.push(
            table
                .header
                .iter()
                .map(|cell| parse_markup(cell))
                .collect::<Result<Vec<_>>>()?,
        );
        for row in &table.rows {
            rows.push(
                row.iter()
                    .map(|cell| parse_markup(cell))
                    .collect::<Result<Vec<_>>>()?,
            );
        }
        Ok(TableBlock {
            columns: self.columns(&self.sheet.breakdown_columns),
            rows,
            header: true,
            style: self.sheet.breakdown_table.clone(),
        })
    }

    fn columns(&self, fractions: &[f32]) -> Vec<f32> {
        let width = self.geometry.frame_width();
        fractions.iter().map(|fraction| fraction * width).collect()
    }
}

/// Places blocks into the frame, opening pages as needed.
#[derive(Debug)]
pub struct Paginator {
    geometry: PageGeometry,
    pages: Vec<Page>,
    current: Page,
    /// Top of the free space on the current page.
    y: f32,
}

impl Paginator {
    #[must_use]
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            current: Page::default(),
            y: geometry.frame_top(),
        }
    }

    fn remaining(&self) -> f32 {
        self.y - self.geometry.frame_bottom()
    }

    fn at_top(&self) -> bool {
        self.y >= self.geometry.frame_top()
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.y = self.geometry.frame_top();
    }

    pub fn push(&mut self, block: &Block) {
        match block {
            Block::Paragraph { runs, style } => self.paragraph(runs, style),
            Block::Preformatted { lines, style } => self.preformatted(lines, style),
            // a spacer never opens a page; it is dropped at the top of one
            Block::Spacer(height) if !self.at_top() => self.y -= height,
            Block::Spacer(_) => {}
            Block::Rule => self.rule(),
            Block::Table(table) => self.table(table),
        }
    }

    /// Finish the last page and return all pages.
    #[must_use]
    pub fn finish(mut self) -> Vec<Page> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }

    fn paragraph(&mut self, runs: &[TextRun], style: &ParagraphStyle) {
        let frame_width = self.geometry.frame_width();
        let lines = wrap_runs(runs, style.face, style.size, frame_width);
        if lines.is_empty() {
            return;
        }
        if !self.at_top() {
            self.y -= style.space_before;
        }
        for line in &lines {
            if self.remaining() < style.leading && !self.at_top() {
                self.new_page();
            }
            let x = match style.align {
                Align::Left => self.geometry.frame_left(),
                Align::Center => {
                    self.geometry.frame_left() + (frame_width - line.width).max(0.0) / 2.0
                }
            };
            self.draw_line(line, x, self.y - style.size, style.size, style.color);
            self.y -= style.leading;
        }
        self.y -= style.space_after;
    }

    fn preformatted(&mut self, lines: &[String], style: &ParagraphStyle) {
        for line in lines {
            if self.remaining() < style.leading && !self.at_top() {
                self.new_page();
            }
            if !line.is_empty() {
                self.current.ops.push(DrawOp::Text {
                    x: self.geometry.frame_left(),
                    y: self.y - style.size,
                    face: style.face,
                    size: style.size,
                    color: style.color,
                    text: line.clone(),
                });
            }
            self.y -= style.leading;
        }
        self.y -= style.space_after;
    }

    fn rule(&mut self) {
        if self.remaining() < 2.0 * RULE_SPACE && !self.at_top() {
            self.new_page();
        }
        let y = self.y - RULE_SPACE;
        let left = self.geometry.frame_left();
        self.current.ops.push(DrawOp::Line {
            x1: left,
            y1: y,
            x2: left + self.geometry.frame_width(),
            y2: y,
            width: RULE_WIDTH,
            color: Color::GREY,
        });
        self.y -= 2.0 * RULE_SPACE;
    }

    fn table(&mut self, table: &TableBlock) {
        let style = &table.style;
        let cell = &style.cell;
        let mut body_index = 0;

        for (index, row) in table.rows.iter().enumerate() {
            let is_header = table.header && index == 0;
            let bottom = if is_header {
                style.header_bottom_padding.unwrap_or(style.padding.bottom)
            } else {
                style.padding.bottom
            };
            let background = if is_header {
                style.header_background
            } else {
                let color = (!style.row_backgrounds.is_empty())
                    .then(|| style.row_backgrounds[body_index % style.row_backgrounds.len()]);
                body_index += 1;
                color
            };

            let mut cells: Vec<Vec<Line>> = row
                .iter()
                .zip(&table.columns)
                .map(|(runs, width)| {
                    let inner = (width - style.padding.left - style.padding.right).max(1.0);
                    wrap_runs(runs, cell.face, cell.size, inner)
                })
                .collect();
            let pad = style.padding.top + bottom;

            loop {
                let needed = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);
                let height = pad + needed as f32 * cell.leading;
                if height <= self.remaining() {
                    self.draw_row(table, &cells, height, background);
                    self.y -= height;
                    break;
                }
                if !self.at_top() && height <= self.geometry.frame_height() {
                    self.new_page();
                    continue;
                }

                let fit = ((self.remaining() - pad) / cell.leading).floor().max(0.0) as usize;
                if fit == 0 && !self.at_top() {
                    self.new_page();
                    continue;
                }
                let fit = fit.max(1);
                let head: Vec<Vec<Line>> = cells
                    .iter_mut()
                    .map(|lines| lines.drain(..fit.min(lines.len())).collect())
                    .collect();
                let height = pad + fit as f32 * cell.leading;
                self.draw_row(table, &head, height, background);
                self.y -= height;
                self.new_page();
            }
        }
    }

    fn draw_row(
        &mut self,
        table: &TableBlock,
        cells: &[Vec<Line>],
        height: f32,
        background: Option<Color>,
    ) {
        let style = &table.style;
        let left = self.geometry.frame_left();
        let total: f32 = table.columns.iter().sum();
        let top = self.y;

        if let Some(color) = background {
            self.current.ops.push(DrawOp::FillRect {
                x: left,
                y: top - height,
                width: total,
                height,
                color,
            });
        }

        let mut x = left;
        for (lines, width) in cells.iter().zip(&table.columns) {
            for (i, line) in lines.iter().enumerate() {
                let baseline =
                    top - style.padding.top - style.cell.size - i as f32 * style.cell.leading;
                self.draw_line(
                    line,
                    x + style.padding.left,
                    baseline,
                    style.cell.size,
                    style.cell.color,
                );
            }
            x += width;
        }

        if let Some((width, color)) = style.grid {
            for y in [top, top - height] {
                self.current.ops.push(DrawOp::Line {
                    x1: left,
                    y1: y,
                    x2: left + total,
                    y2: y,
                    width,
                    color,
                });
            }
            let mut x = left;
            for boundary in std::iter::once(0.0).chain(table.columns.iter().copied()) {
                x += boundary;
                self.current.ops.push(DrawOp::Line {
                    x1: x,
                    y1: top,
                    x2: x,
                    y2: top - height,
                    width,
                    color,
                });
            }
        }
    }

    fn draw_line(&mut self, line: &Line, x: f32, baseline: f32, size: f32, color: Color) {
        let mut cursor = x;
        for span in &line.spans {
            self.current.ops.push(DrawOp::Text {
                x: cursor,
                y: baseline,
                face: span.face,
                size,
                color,
                text: span.text.clone(),
            });
            cursor += text_width(&span.text, span.face, size);
        }
    }
}
