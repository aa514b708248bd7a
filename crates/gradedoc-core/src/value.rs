//! Tagged view over raw JSON values.
//!
//! Every raw value is classified exactly once into a [`FieldValue`] and the
//! fallback logic in the extractor and breakdown analyzer dispatches on that
//! tag instead of probing the value repeatedly.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Number, Value};

/// A single grading record: arbitrary keys, arbitrary values.
///
/// Key order is the order in which keys appeared in the input document.
pub type RawRecord = Map<String, Value>;

/// Borrowed, tagged view of a raw value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Number(&'a Number),
    Text(&'a str),
    Sequence(&'a [Value]),
    Mapping(&'a RawRecord),
    Flag(bool),
    Null,
}

impl<'a> FieldValue<'a> {
    /// Classify a raw value.
    #[inline]
    #[must_use]
    pub fn of(value: &'a Value) -> Self {
        match value {
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::Sequence(items),
            Value::Object(map) => Self::Mapping(map),
            Value::Bool(b) => Self::Flag(*b),
            Value::Null => Self::Null,
        }
    }

    /// Numeric value, if this is a number. Booleans are not numbers.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Text value, if this is a string.
    #[inline]
    #[must_use]
    pub const fn as_text(&self) -> Option<&'a str> {
        match *self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// `true` for values that are neither sequences nor mappings.
    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Self::Sequence(_) | Self::Mapping(_))
    }

    /// Human-readable rendering used for every stringified field.
    ///
    /// Text is returned verbatim, numbers in their JSON form (`10`, `10.0`),
    /// null as the empty string and containers as compact JSON.
    #[must_use]
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => (*s).to_string(),
            Self::Flag(b) => b.to_string(),
            Self::Null => String::new(),
            Self::Sequence(items) => {
                serde_json::to_string(items).unwrap_or_else(|_| String::from("[]"))
            }
            Self::Mapping(map) => serde_json::to_string(map).unwrap_or_else(|_| String::from("{}")),
        }
    }
}

/// Extract the first decimal number embedded in free text.
///
/// `"10 points"` gives `10.0`, `"score: 7.5/10"` gives `7.5`.
#[must_use]
pub fn scan_number(text: &str) -> Option<f64> {
    static NUMBER_PATTERN: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\d+\.?\d*").expect("Invalid number regex"));

    let found = NUMBER_PATTERN.find(text)?;
    found.as_str().trim_end_matches('.').parse::<f64>().ok()
}

/// The numeric zero used as the default for scores.
#[inline]
#[must_use]
pub fn zero() -> Number {
    Number::from(0)
}

/// Floating-point value of a score, `0.0` when it cannot be represented.
#[inline]
#[must_use]
pub fn number_as_f64(number: &Number) -> f64 {
    number.as_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classification() {
        assert!(matches!(FieldValue::of(&json!(3)), FieldValue::Number(_)));
        assert!(matches!(FieldValue::of(&json!("x")), FieldValue::Text("x")));
        assert!(matches!(FieldValue::of(&json!([1])), FieldValue::Sequence(_)));
        assert!(matches!(FieldValue::of(&json!({})), FieldValue::Mapping(_)));
        assert!(matches!(FieldValue::of(&json!(true)), FieldValue::Flag(true)));
        assert!(matches!(FieldValue::of(&Value::Null), FieldValue::Null));
    }

    #[test]
    fn test_booleans_are_not_numeric() {
        assert_eq!(FieldValue::of(&json!(true)).as_f64(), None);
        assert_eq!(FieldValue::of(&json!(2.5)).as_f64(), Some(2.5));
    }

    #[test]
    fn test_display_string() {
        assert_eq!(FieldValue::of(&json!(10)).to_display_string(), "10");
        assert_eq!(FieldValue::of(&json!(10.0)).to_display_string(), "10.0");
        assert_eq!(FieldValue::of(&json!("a b")).to_display_string(), "a b");
        assert_eq!(FieldValue::of(&Value::Null).to_display_string(), "");
        assert_eq!(
            FieldValue::of(&json!({"k": [1, 2]})).to_display_string(),
            r#"{"k":[1,2]}"#
        );
    }

    #[test]
    fn test_scan_number() {
        assert_eq!(scan_number("10 points"), Some(10.0));
        assert_eq!(scan_number("score: 7.5/10"), Some(7.5));
        assert_eq!(scan_number("about 3. maybe"), Some(3.0));
        assert_eq!(scan_number("no digits here"), None);
        assert_eq!(scan_number(""), None);
    }

    #[test]
    fn test_scalar() {
        assert!(FieldValue::of(&json!("t")).is_scalar());
        assert!(FieldValue::of(&json!(null)).is_scalar());
        assert!(!FieldValue::of(&json!([])).is_scalar());
        assert!(!FieldValue::of(&json!({})).is_scalar());
    }
}
