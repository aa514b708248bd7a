//! Canonical field extraction.
//!
//! Resolves the seven canonical fields of a grading record from the key
//! roles detected by [`crate::classifier`]. Extraction never fails: any
//! field that cannot be resolved takes its documented default.

use crate::classifier::{KeyCategory, KeyRoles};
use crate::value::{scan_number, zero, FieldValue, RawRecord};
use serde::Serialize;
use serde_json::{Number, Value};

pub const DEFAULT_QUESTION_ID: &str = "Unknown Question";
pub const DEFAULT_TOPIC: &str = "No Topic";
pub const DEFAULT_ANSWER: &str = "No answer provided";
pub const DEFAULT_FEEDBACK: &str = "No feedback provided";

/// Sub-patterns that make a score key look like a maximum, in priority order.
pub const MAX_POINTS_HINTS: &[&str] = &["max", "maximum", "total"];

/// Sub-patterns that make a score key look like an achieved score, in priority order.
pub const STUDENT_SCORE_HINTS: &[&str] = &["student", "actual", "achieved", "score"];

/// Canonical view of one graded question.
///
/// Every field always carries a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalQuestionInfo {
    pub question_id: String,
    pub topic: String,
    pub max_points: Number,
    pub student_score: Number,
    pub student_answer: String,
    pub grading_breakdown: Vec<Value>,
    pub overall_feedback: String,
}

impl Default for CanonicalQuestionInfo {
    fn default() -> Self {
        Self {
            question_id: DEFAULT_QUESTION_ID.to_string(),
            topic: DEFAULT_TOPIC.to_string(),
            max_points: zero(),
            student_score: zero(),
            student_answer: DEFAULT_ANSWER.to_string(),
            grading_breakdown: Vec::new(),
            overall_feedback: DEFAULT_FEEDBACK.to_string(),
        }
    }
}

/// Extract the canonical fields of `record` using roles detected on
/// (possibly another) record of the same batch.
#[must_use]
pub fn extract(record: &RawRecord, roles: &KeyRoles) -> CanonicalQuestionInfo {
    let score_keys = roles.keys(KeyCategory::ScoreInfo);

    CanonicalQuestionInfo {
        question_id: resolve_text(record, roles.keys(KeyCategory::Identification))
            .unwrap_or_else(|| miss("question_id", DEFAULT_QUESTION_ID)),
        topic: resolve_text(record, roles.keys(KeyCategory::Topic))
            .unwrap_or_else(|| miss("topic", DEFAULT_TOPIC)),
        max_points: find_numeric(record, score_keys, MAX_POINTS_HINTS),
        student_score: find_numeric(record, score_keys, STUDENT_SCORE_HINTS),
        student_answer: resolve_text(record, roles.keys(KeyCategory::Answer))
            .unwrap_or_else(|| miss("student_answer", DEFAULT_ANSWER)),
        grading_breakdown: resolve_sequence(record, roles.keys(KeyCategory::Breakdown)),
        overall_feedback: resolve_text(record, roles.keys(KeyCategory::Feedback))
            .unwrap_or_else(|| miss("overall_feedback", DEFAULT_FEEDBACK)),
    }
}

fn miss(field: &str, default: &str) -> String {
    log::debug!("no key resolved for {field}, using default {default:?}");
    default.to_string()
}

/// Stringified value of the best candidate key present in the record.
///
/// Preference: first scalar value, then first present key of any shape.
/// Containers are only used when no scalar candidate is present.
fn resolve_text(record: &RawRecord, candidates: &[String]) -> Option<String> {
    let present: Vec<FieldValue<'_>> = candidates
        .iter()
        .filter_map(|key| record.get(key))
        .map(FieldValue::of)
        .collect();

    present
        .iter()
        .find(|value| value.is_scalar())
        .or_else(|| present.first())
        .map(FieldValue::to_display_string)
}

/// First candidate whose value is a sequence.
fn resolve_sequence(record: &RawRecord, candidates: &[String]) -> Vec<Value> {
    candidates
        .iter()
        .filter_map(|key| record.get(key))
        .find_map(|value| match FieldValue::of(value) {
            FieldValue::Sequence(items) => Some(items.to_vec()),
            _ => None,
        })
        .unwrap_or_default()
}

/// Resolve a numeric value from score-like keys.
///
/// For each hint in priority order, for each candidate key containing the
/// hint and present in the record: a number is returned as-is, text yields
/// its first embedded decimal number as a float. Returns `0` when nothing
/// resolves.
#[must_use]
pub fn find_numeric(record: &RawRecord, candidates: &[String], hints: &[&str]) -> Number {
    let lowered: Vec<(&String, String)> = candidates
        .iter()
        .map(|key| (key, key.to_lowercase()))
        .collect();

    for hint in hints {
        for (key, key_lower) in &lowered {
            if !key_lower.contains(hint) {
                continue;
            }
            let Some(value) = record.get(key.as_str()) else {
                continue;
            };
            match FieldValue::of(value) {
                FieldValue::Number(n) => return n.clone(),
                FieldValue::Text(text) => {
                    if let Some(number) = scan_number(text).and_then(Number::from_f64) {
                        return number;
                    }
                }
                _ => {}
            }
        }
    }

    log::debug!("no numeric value for hints {hints:?} among {candidates:?}");
    zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    fn extract_self(value: Value) -> CanonicalQuestionInfo {
        let record = record(value);
        extract(&record, &classify(&record))
    }

    #[test]
    fn test_defaults_when_nothing_matches() {
        let info = extract_self(json!({"foo": 1, "bar": "x"}));
        assert_eq!(info, CanonicalQuestionInfo::default());
        assert_eq!(info.question_id, "Unknown Question");
        assert_eq!(info.topic, "No Topic");
        assert_eq!(info.max_points, zero());
        assert_eq!(info.student_score, zero());
        assert_eq!(info.student_answer, "No answer provided");
        assert!(info.grading_breakdown.is_empty());
        assert_eq!(info.overall_feedback, "No feedback provided");
    }

    #[test]
    fn test_numeric_from_string_and_number() {
        let info = extract_self(json!({"max_score": "10 points", "student_score": 7}));
        assert_eq!(info.max_points.as_f64(), Some(10.0));
        assert!(info.max_points.is_f64());
        assert_eq!(info.student_score, Number::from(7));
    }

    #[test]
    fn test_max_hint_priority() {
        // "total" is consulted only after "max" found nothing
        let info = extract_self(json!({"total_points": 30, "max_points": 20}));
        assert_eq!(info.max_points, Number::from(20));
    }

    #[test]
    fn test_student_score_prefers_student_hint() {
        let info = extract_self(json!({"final_score": 4, "student_points": 9}));
        assert_eq!(info.student_score, Number::from(9));
    }

    #[test]
    fn test_numeric_skips_unparseable_text() {
        let info = extract_self(json!({"max_mark": "n/a", "total_marks": "12"}));
        assert_eq!(info.max_points.as_f64(), Some(12.0));
    }

    #[test]
    fn test_answer_takes_first_scalar() {
        let info = extract_self(json!({
            "student_score": 16,
            "student_answer": "x = 2"
        }));
        assert_eq!(info.student_answer, "16");
    }

    #[test]
    fn test_numeric_id_before_text_key() {
        let info = extract_self(json!({
            "question_number": 1,
            "question": "What is 2+2?"
        }));
        assert_eq!(info.question_id, "1");
    }

    #[test]
    fn test_numeric_keys_matched_case_insensitively() {
        let info = extract_self(json!({"MaxPoints": 8, "StudentScore": "6.5"}));
        assert_eq!(info.max_points, Number::from(8));
        assert_eq!(info.student_score.as_f64(), Some(6.5));
    }

    #[test]
    fn test_feedback_skips_breakdown_sequence() {
        let info = extract_self(json!({
            "evaluation_criteria": [{"criterion": "c"}],
            "general_comments": "ok"
        }));
        assert_eq!(info.overall_feedback, "ok");
        assert_eq!(info.grading_breakdown.len(), 1);
    }

    #[test]
    fn test_container_used_when_only_candidate() {
        let info = extract_self(json!({"feedback": {"tone": "kind"}}));
        assert_eq!(info.overall_feedback, r#"{"tone":"kind"}"#);
    }

    #[test]
    fn test_numeric_question_id_is_stringified() {
        let info = extract_self(json!({"question_number": 3}));
        assert_eq!(info.question_id, "3");
    }

    #[test]
    fn test_breakdown_requires_sequence() {
        let info = extract_self(json!({"rubric": "not a list", "grading_items": [1, 2]}));
        assert_eq!(info.grading_breakdown, vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_roles_from_other_record() {
        let first = record(json!({"question_id": "Q1", "topic": "T"}));
        let second = record(json!({"qid": "Q2", "topic": "U"}));
        let roles = classify(&first);
        let info = extract(&second, &roles);
        assert_eq!(info.question_id, "Unknown Question");
        assert_eq!(info.topic, "U");
    }
}
