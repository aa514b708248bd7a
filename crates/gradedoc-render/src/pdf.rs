//! Serialization of laid-out pages with `lopdf`.
//!
//! Output is fully deterministic: no creation date, no document id, and
//! coordinates rounded to hundredths of a point.

use crate::fonts::{encode_text, FontFace};
use crate::layout::{DrawOp, Page};
use crate::style::{Color, PageGeometry};
use gradedoc_core::{ReportError, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

const PDF_VERSION: &str = "1.5";

fn real(value: f32) -> Object {
    ((value * 100.0).round() / 100.0).into()
}

fn pdf_error(error: impl std::fmt::Display) -> ReportError {
    ReportError::Pdf(error.to_string())
}

/// Builds one content stream, skipping redundant state changes.
#[derive(Default)]
struct ContentBuilder {
    operations: Vec<Operation>,
    fill: Option<Color>,
    stroke: Option<(Color, f32)>,
}

impl ContentBuilder {
    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    fn set_fill(&mut self, color: Color) {
        if self.fill != Some(color) {
            self.op("rg", vec![real(color.r), real(color.g), real(color.b)]);
            self.fill = Some(color);
        }
    }

    fn set_stroke(&mut self, color: Color, width: f32) {
        if self.stroke != Some((color, width)) {
            self.op("RG", vec![real(color.r), real(color.g), real(color.b)]);
            self.op("w", vec![real(width)]);
            self.stroke = Some((color, width));
        }
    }

    fn draw(&mut self, op: &DrawOp) {
        match op {
            DrawOp::Text {
                x,
                y,
                face,
                size,
                color,
                text,
            } => {
                self.set_fill(*color);
                self.op("BT", vec![]);
                self.op("Tf", vec![face.resource_name().into(), real(*size)]);
                self.op("Td", vec![real(*x), real(*y)]);
                self.op(
                    "Tj",
                    vec![Object::String(encode_text(text), StringFormat::Literal)],
                );
                self.op("ET", vec![]);
            }
            DrawOp::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => {
                self.set_fill(*color);
                self.op("re", vec![real(*x), real(*y), real(*width), real(*height)]);
                self.op("f", vec![]);
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => {
                self.set_stroke(*color, *width);
                self.op("m", vec![real(*x1), real(*y1)]);
                self.op("l", vec![real(*x2), real(*y2)]);
                self.op("S", vec![]);
            }
        }
    }

    fn encode(self) -> Result<Vec<u8>> {
        Content {
            operations: self.operations,
        }
        .encode()
        .map_err(pdf_error)
    }
}

/// Write `pages` as a PDF document and return its bytes.
///
/// # Errors
///
/// Returns [`ReportError::Pdf`] if a content stream or the document cannot be
/// encoded.
pub fn write_pdf(pages: &[Page], geometry: &PageGeometry) -> Result<Vec<u8>> {
    let mut doc = Document::with_version(PDF_VERSION);
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for face in FontFace::ALL {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(face.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let mut builder = ContentBuilder::default();
        for op in &page.ops {
            builder.draw(op);
        }
        let content_id = doc.add_object(Stream::new(Dictionary::new(), builder.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            real(geometry.width),
            real(geometry.height),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).map_err(pdf_error)?;
    log::debug!("encoded {} page(s) into {} bytes", pages.len(), buffer.len());
    Ok(buffer)
}
