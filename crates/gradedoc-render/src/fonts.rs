//! Base-14 Helvetica faces, their advance widths and WinAnsi encoding.
//!
//! Widths are the AFM advance widths in 1/1000 em for printable ASCII. Bytes
//! outside that range use a per-face default, which is close enough for the
//! accented Latin-1 letters a French report contains.

/// One of the four Helvetica faces of the PDF base-14 set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontFace {
    Regular,
    Bold,
    Oblique,
    BoldOblique,
}

impl FontFace {
    pub const ALL: [Self; 4] = [Self::Regular, Self::Bold, Self::Oblique, Self::BoldOblique];

    #[inline]
    #[must_use]
    pub const fn from_style(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => Self::Regular,
            (true, false) => Self::Bold,
            (false, true) => Self::Oblique,
            (true, true) => Self::BoldOblique,
        }
    }

    /// Apply run styling on top of a paragraph's base face.
    #[inline]
    #[must_use]
    pub const fn with_style(self, bold: bool, italic: bool) -> Self {
        Self::from_style(self.is_bold() || bold, self.is_italic() || italic)
    }

    #[inline]
    #[must_use]
    pub const fn is_bold(self) -> bool {
        matches!(self, Self::Bold | Self::BoldOblique)
    }

    #[inline]
    #[must_use]
    pub const fn is_italic(self) -> bool {
        matches!(self, Self::Oblique | Self::BoldOblique)
    }

    /// PostScript name used as `/BaseFont`.
    #[must_use]
    pub const fn base_font(self) -> &'static str {
        match self {
            Self::Regular => "Helvetica",
            Self::Bold => "Helvetica-Bold",
            Self::Oblique => "Helvetica-Oblique",
            Self::BoldOblique => "Helvetica-BoldOblique",
        }
    }

    /// Name of the font in the page resource dictionary.
    #[must_use]
    pub const fn resource_name(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
            Self::Oblique => "F3",
            Self::BoldOblique => "F4",
        }
    }
}

/// Helvetica widths for bytes 32..=126.
const REGULAR_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Helvetica-Bold widths for bytes 32..=126.
const BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    333, 333, 584, 584, 584, 611, 975, // ':'..'@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    333, 278, 333, 584, 556, 333, // '['..'`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a'..'m'
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n'..'z'
    389, 280, 389, 584, // '{'..'~'
];

/// Unicode characters of the WinAnsi 0x80..=0x9F block.
const WIN_ANSI_HIGH: [(char, u8); 27] = [
    ('€', 0x80),
    ('‚', 0x82),
    ('ƒ', 0x83),
    ('„', 0x84),
    ('…', 0x85),
    ('†', 0x86),
    ('‡', 0x87),
    ('ˆ', 0x88),
    ('‰', 0x89),
    ('Š', 0x8A),
    ('‹', 0x8B),
    ('Œ', 0x8C),
    ('Ž', 0x8E),
    ('‘', 0x91),
    ('’', 0x92),
    ('“', 0x93),
    ('”', 0x94),
    ('•', 0x95),
    ('–', 0x96),
    ('—', 0x97),
    ('˜', 0x98),
    ('™', 0x99),
    ('š', 0x9A),
    ('›', 0x9B),
    ('œ', 0x9C),
    ('ž', 0x9E),
    ('Ÿ', 0x9F),
];

/// Map one character to its WinAnsi byte, `?` when it has none.
#[must_use]
pub fn encode_char(ch: char) -> u8 {
    match ch {
        '\t' => b' ',
        ' '..='~' => ch as u8,
        '\u{A0}'..='\u{FF}' => ch as u32 as u8,
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|(candidate, _)| *candidate == ch)
            .map_or(b'?', |&(_, byte)| byte),
    }
}

/// Encode a string for a WinAnsi-encoded simple font.
#[must_use]
pub fn encode_text(text: &str) -> Vec<u8> {
    text.chars().map(encode_char).collect()
}

/// Advance width of an encoded byte in 1/1000 em.
#[must_use]
pub fn byte_width(byte: u8, face: FontFace) -> u16 {
    let table = if face.is_bold() {
        &BOLD_WIDTHS
    } else {
        &REGULAR_WIDTHS
    };
    match byte {
        32..=126 => table[usize::from(byte - 32)],
        0xA0 => 278,
        0x85 | 0x89 | 0x97 => 1000,
        0x95 => 350,
        0x91 | 0x92 if face.is_bold() => 278,
        0x91 | 0x92 => 222,
        0xC0..=0xDE => 722,
        _ if face.is_bold() => 611,
        _ => 556,
    }
}

/// Width of `text` in points at `size`.
#[must_use]
pub fn text_width(text: &str, face: FontFace, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|ch| u32::from(byte_width(encode_char(ch), face)))
        .sum();
    units as f32 * size / 1000.0
}
