//! Minimal plain-text report used when the structured layout fails.
//!
//! The fallback never interprets markup, so no content can make it fail:
//! a title, the best score it can find and a pretty-printed dump of the input.

use crate::fonts::FontFace;
use crate::layout::Block;
use crate::style::{Align, Color, PageGeometry, ParagraphStyle};
use crate::wrap::wrap_preformatted;
use gradedoc_core::{FieldValue, Labels, Result, TextRun};
use serde_json::Value;

/// Top-level score field of a wrapped report.
pub const TOTAL_SCORE_FIELD: &str = "total_score";

/// Score fields looked up, in order, on the first record of a list.
pub const RECORD_SCORE_FIELDS: [&str; 2] = ["student_score_for_question", "student_score"];

const TITLE_STYLE: ParagraphStyle = ParagraphStyle {
    face: FontFace::Regular,
    size: 12.0,
    leading: 14.4,
    space_before: 0.0,
    space_after: 14.0,
    color: Color::BLACK,
    align: Align::Center,
};

const SCORE_STYLE: ParagraphStyle = ParagraphStyle {
    face: FontFace::Bold,
    size: 12.0,
    leading: 14.4,
    space_before: 0.0,
    space_after: 10.0,
    color: Color::BLACK,
    align: Align::Left,
};

const DUMP_STYLE: ParagraphStyle = ParagraphStyle::body(9.0, 11.0);

/// Best-effort score of an arbitrary input, as display text.
///
/// A mapping reports its `total_score`. A list reports the first non-null
/// score field of its first element when that element is a mapping.
#[must_use]
pub fn fallback_score(input: &Value) -> Option<String> {
    let score = match FieldValue::of(input) {
        FieldValue::Mapping(record) => record.get(TOTAL_SCORE_FIELD),
        FieldValue::Sequence(items) => match items.first().map(FieldValue::of) {
            Some(FieldValue::Mapping(first)) => RECORD_SCORE_FIELDS
                .iter()
                .filter_map(|field| first.get(*field))
                .find(|value| !value.is_null()),
            _ => None,
        },
        _ => None,
    };
    score
        .filter(|value| !value.is_null())
        .map(|value| FieldValue::of(value).to_display_string())
}

fn plain(text: String, style: ParagraphStyle) -> Block {
    Block::Paragraph {
        runs: vec![TextRun {
            text,
            bold: false,
            italic: false,
        }],
        style,
    }
}

/// Story of the fallback report.
///
/// # Errors
///
/// Only if the input cannot be serialized back to JSON.
pub fn fallback_story(
    input: &Value,
    labels: &Labels,
    geometry: &PageGeometry,
) -> Result<Vec<Block>> {
    let score = fallback_score(input).unwrap_or_else(|| labels.not_available.to_string());
    let dump = serde_json::to_string_pretty(input)?;
    let lines = wrap_preformatted(&dump, DUMP_STYLE.face, DUMP_STYLE.size, geometry.frame_width());

    Ok(vec![
        plain(labels.fallback_title.to_string(), TITLE_STYLE),
        plain(format!("{} {score}", labels.final_score), SCORE_STYLE),
        Block::Preformatted {
            lines,
            style: DUMP_STYLE,
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_score_from_mapping() {
        assert_eq!(
            fallback_score(&json!({"total_score": 16, "corrections": []})),
            Some("16".to_string())
        );
        assert_eq!(fallback_score(&json!({"total_score": null})), None);
        assert_eq!(fallback_score(&json!({"score": 3})), None);
    }

    #[test]
    fn test_score_from_list() {
        let input = json!([{"student_score": 7}, {"student_score": 9}]);
        assert_eq!(fallback_score(&input), Some("7".to_string()));

        let input = json!([{"student_score_for_question": null, "student_score": 4}]);
        assert_eq!(fallback_score(&input), Some("4".to_string()));

        let input = json!([{"student_score_for_question": 2.5, "student_score": 4}]);
        assert_eq!(fallback_score(&input), Some("2.5".to_string()));

        // zero is a score, not a missing value
        let input = json!([{"student_score_for_question": 0, "student_score": 4}]);
        assert_eq!(fallback_score(&input), Some("0".to_string()));

        assert_eq!(fallback_score(&json!(["x"])), None);
        assert_eq!(fallback_score(&json!([])), None);
    }

    #[test]
    fn test_scalars_have_no_score() {
        assert_eq!(fallback_score(&json!(42)), None);
        assert_eq!(fallback_score(&Value::Null), None);
    }

    #[test]
    fn test_story_has_score_line() {
        let story =
            fallback_story(&json!(null), &Labels::english(), &PageGeometry::default()).unwrap();
        assert_eq!(story.len(), 3);
        match &story[1] {
            Block::Paragraph { runs, .. } => assert_eq!(runs[0].text, "Final score: N/A"),
            other => panic!("unexpected block {other:?}"),
        }
    }
}
