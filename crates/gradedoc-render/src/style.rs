//! Page geometry and the paragraph/table styles of the report.

use crate::fonts::FontFace;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Points per inch.
pub const INCH: f32 = 72.0;

/// RGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const DARK_BLUE: Self = Self::rgb(0.0, 0.0, 0.545);
    pub const LIGHT_BLUE: Self = Self::rgb(0.678, 0.847, 0.902);
    pub const WHITE_SMOKE: Self = Self::rgb(0.961, 0.961, 0.961);
    pub const GREY: Self = Self::rgb(0.5, 0.5, 0.5);

    #[inline]
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Supported paper sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    Letter,
    A4,
}

impl PageSize {
    /// Width and height in points.
    #[must_use]
    pub const fn dimensions(self) -> (f32, f32) {
        match self {
            Self::Letter => (612.0, 792.0),
            Self::A4 => (595.28, 841.89),
        }
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "letter" => Ok(Self::Letter),
            "a4" => Ok(Self::A4),
            other => Err(format!("unknown page size '{other}' (expected letter or a4)")),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Letter => "letter",
            Self::A4 => "a4",
        })
    }
}

/// Page size and the single frame content flows into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    #[must_use]
    pub const fn new(size: PageSize) -> Self {
        let (width, height) = size.dimensions();
        Self {
            width,
            height,
            margin: INCH,
        }
    }

    #[inline]
    #[must_use]
    pub fn frame_left(&self) -> f32 {
        self.margin
    }

    #[inline]
    #[must_use]
    pub fn frame_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    #[inline]
    #[must_use]
    pub fn frame_top(&self) -> f32 {
        self.height - self.margin
    }

    #[inline]
    #[must_use]
    pub fn frame_bottom(&self) -> f32 {
        self.margin
    }

    #[inline]
    #[must_use]
    pub fn frame_height(&self) -> f32 {
        self.frame_top() - self.frame_bottom()
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphStyle {
    pub face: FontFace,
    pub size: f32,
    pub leading: f32,
    pub space_before: f32,
    pub space_after: f32,
    pub color: Color,
    pub align: Align,
}

impl ParagraphStyle {
    #[must_use]
    pub const fn body(size: f32, leading: f32) -> Self {
        Self {
            face: FontFace::Regular,
            size,
            leading,
            space_before: 0.0,
            space_after: 0.0,
            color: Color::BLACK,
            align: Align::Left,
        }
    }
}

/// Cell padding in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    pub cell: ParagraphStyle,
    pub padding: Padding,
    /// Bottom padding of the first row when it is a header.
    pub header_bottom_padding: Option<f32>,
    pub header_background: Option<Color>,
    /// Backgrounds cycled over body rows.
    pub row_backgrounds: Vec<Color>,
    /// Grid line width and color.
    pub grid: Option<(f32, Color)>,
}

/// All styles used by the structured and the fallback report.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    pub title: ParagraphStyle,
    pub heading: ParagraphStyle,
    pub subheading: ParagraphStyle,
    pub body: ParagraphStyle,
    pub code: ParagraphStyle,
    pub info_table: TableStyle,
    pub breakdown_table: TableStyle,
    pub space_after_title: f32,
    pub space_after_block: f32,
    pub space_between_sections: f32,
    /// Column fractions of the info table.
    pub info_columns: [f32; 2],
    /// Column fractions of the breakdown table.
    pub breakdown_columns: [f32; 4],
}

impl Default for StyleSheet {
    fn default() -> Self {
        let body = ParagraphStyle::body(10.0, 12.0);
        Self {
            title: ParagraphStyle {
                face: FontFace::Bold,
                size: 16.0,
                leading: 22.0,
                space_before: 0.0,
                space_after: 12.0,
                color: Color::DARK_BLUE,
                align: Align::Center,
            },
            heading: ParagraphStyle {
                face: FontFace::Bold,
                size: 14.0,
                leading: 18.0,
                space_before: 12.0,
                space_after: 6.0,
                color: Color::DARK_BLUE,
                align: Align::Left,
            },
            subheading: ParagraphStyle {
                face: FontFace::Bold,
                size: 12.0,
                leading: 14.4,
                space_before: 12.0,
                space_after: 6.0,
                color: Color::DARK_BLUE,
                align: Align::Left,
            },
            body,
            code: ParagraphStyle::body(8.0, 9.6),
            info_table: TableStyle {
                cell: body,
                padding: Padding {
                    left: 4.0,
                    right: 4.0,
                    top: 3.0,
                    bottom: 8.0,
                },
                header_bottom_padding: None,
                header_background: None,
                row_backgrounds: Vec::new(),
                grid: None,
            },
            breakdown_table: TableStyle {
                cell: body,
                padding: Padding {
                    left: 6.0,
                    right: 6.0,
                    top: 6.0,
                    bottom: 6.0,
                },
                header_bottom_padding: Some(12.0),
                header_background: Some(Color::LIGHT_BLUE),
                row_backgrounds: vec![Color::WHITE, Color::WHITE_SMOKE],
                grid: Some((1.0, Color::BLACK)),
            },
            space_after_title: 0.3 * INCH,
            space_after_block: 0.2 * INCH,
            space_between_sections: 0.4 * INCH,
            info_columns: [0.28, 0.72],
            breakdown_columns: [0.30, 0.10, 0.09, 0.51],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_frame() {
        let geometry = PageGeometry::new(PageSize::Letter);
        assert_eq!(geometry.frame_width(), 468.0);
        assert_eq!(geometry.frame_top(), 720.0);
        assert_eq!(geometry.frame_height(), 648.0);
    }

    #[test]
    fn test_page_size_parsing() {
        assert_eq!("A4".parse::<PageSize>(), Ok(PageSize::A4));
        assert_eq!("letter".parse::<PageSize>(), Ok(PageSize::Letter));
        assert!("legal".parse::<PageSize>().is_err());
        assert_eq!(PageSize::A4.to_string(), "a4");
    }

    #[test]
    fn test_column_fractions_fill_frame() {
        let sheet = StyleSheet::default();
        let info: f32 = sheet.info_columns.iter().sum();
        let breakdown: f32 = sheet.breakdown_columns.iter().sum();
        assert!((info - 1.0).abs() < 1e-6);
        assert!((breakdown - 1.0).abs() < 1e-6);
    }
}
