//! Rubric breakdown analysis.
//!
//! Same idea as the top-level classifier, one level deeper: the keys of the
//! first breakdown entry are sorted into four column roles. Unlike the
//! top-level classifier, assignment is exclusive: a key goes to the first
//! group it matches.

use crate::value::{FieldValue, RawRecord};
use serde::Serialize;
use serde_json::Value;

/// Label used when an entry has no keys at all.
pub const UNKNOWN_COLUMN: &str = "Unknown";

/// Minimum length (exclusive, in characters) for a text value to pass as a justification.
const JUSTIFICATION_MIN_CHARS: usize = 20;

/// Column role inside a breakdown entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownField {
    Element,
    MaxPoints,
    Score,
    Justification,
}

const ELEMENT_PATTERNS: &[&str] = &["element", "criterion", "rubric", "part"];
const MAX_POINTS_PATTERNS: &[&str] = &["max", "maximum", "total"];
const SCORE_PATTERNS: &[&str] = &["score", "student", "points", "earned"];
const JUSTIFICATION_PATTERNS: &[&str] = &["justification", "reason", "comment", "feedback"];

impl BreakdownField {
    /// All fields, in the order they are tested.
    pub const ALL: [Self; 4] = [
        Self::Element,
        Self::MaxPoints,
        Self::Score,
        Self::Justification,
    ];

    #[inline]
    #[must_use]
    pub const fn patterns(self) -> &'static [&'static str] {
        match self {
            Self::Element => ELEMENT_PATTERNS,
            Self::MaxPoints => MAX_POINTS_PATTERNS,
            Self::Score => SCORE_PATTERNS,
            Self::Justification => JUSTIFICATION_PATTERNS,
        }
    }
}

/// Keys of the first breakdown entry grouped by column role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BreakdownStructure {
    pub element: Vec<String>,
    pub max_points: Vec<String>,
    pub score: Vec<String>,
    pub justification: Vec<String>,
}

impl BreakdownStructure {
    #[inline]
    #[must_use]
    pub fn keys(&self, field: BreakdownField) -> &[String] {
        match field {
            BreakdownField::Element => &self.element,
            BreakdownField::MaxPoints => &self.max_points,
            BreakdownField::Score => &self.score,
            BreakdownField::Justification => &self.justification,
        }
    }

    fn keys_mut(&mut self, field: BreakdownField) -> &mut Vec<String> {
        match field {
            BreakdownField::Element => &mut self.element,
            BreakdownField::MaxPoints => &mut self.max_points,
            BreakdownField::Score => &mut self.score,
            BreakdownField::Justification => &mut self.justification,
        }
    }
}

/// Analyze the column structure of a breakdown list.
///
/// Only the first entry is inspected. An empty list, or a first entry that is
/// not a mapping, yields an all-empty structure.
#[must_use]
pub fn analyze(breakdown: &[Value]) -> BreakdownStructure {
    let mut structure = BreakdownStructure::default();

    let Some(FieldValue::Mapping(first)) = breakdown.first().map(FieldValue::of) else {
        return structure;
    };

    for key in first.keys() {
        let key_lower = key.to_lowercase();
        let matched = BreakdownField::ALL.into_iter().find(|field| {
            field
                .patterns()
                .iter()
                .any(|pattern| key_lower.contains(pattern))
        });
        if let Some(field) = matched {
            structure.keys_mut(field).push(key.clone());
        }
    }

    structure
}

/// Concrete key used for each table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownColumns {
    pub element: String,
    pub max_points: String,
    pub score: String,
    pub justification: String,
}

impl BreakdownColumns {
    /// Resolve one key per column: the first pattern-matched key when there is
    /// one, otherwise a key picked by value type from `first`.
    #[must_use]
    pub fn resolve(structure: &BreakdownStructure, first: &RawRecord) -> Self {
        let pick = |field: BreakdownField| {
            structure
                .keys(field)
                .first()
                .cloned()
                .unwrap_or_else(|| find_key_by_type(first, field))
        };

        Self {
            element: pick(BreakdownField::Element),
            max_points: pick(BreakdownField::MaxPoints),
            score: pick(BreakdownField::Score),
            justification: pick(BreakdownField::Justification),
        }
    }

    /// Keys in table column order.
    #[must_use]
    pub fn ordered(&self) -> [&str; 4] {
        [
            &self.element,
            &self.max_points,
            &self.score,
            &self.justification,
        ]
    }
}

/// Pick a key of `item` by the type of its value.
///
/// - max points: first strictly positive number
/// - score: first number
/// - justification: first text longer than 20 characters
///
/// Falls back to the first key, or [`UNKNOWN_COLUMN`] for an empty entry.
#[must_use]
pub fn find_key_by_type(item: &RawRecord, field: BreakdownField) -> String {
    let found = item.iter().find(|(_, value)| {
        let value = FieldValue::of(value);
        match field {
            BreakdownField::MaxPoints => value.as_f64().is_some_and(|n| n > 0.0),
            BreakdownField::Score => value.as_f64().is_some(),
            BreakdownField::Justification => value
                .as_text()
                .is_some_and(|text| text.chars().count() > JUSTIFICATION_MIN_CHARS),
            BreakdownField::Element => false,
        }
    });

    found
        .or_else(|| item.iter().next())
        .map_or_else(|| UNKNOWN_COLUMN.to_string(), |(key, _)| key.clone())
}
