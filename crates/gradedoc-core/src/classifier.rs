//! Key-role classification.
//!
//! Maps raw field names to semantic categories by lowercase substring
//! containment against fixed, ordered pattern tables. No reflection, no
//! schema: only the key names of a record are looked at.

use crate::value::RawRecord;
use serde::Serialize;

/// Semantic role a raw key can play in a grading record.
///
/// Categories are tested in declaration order. A key may belong to several
/// categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCategory {
    Identification,
    Topic,
    ScoreInfo,
    Answer,
    Breakdown,
    Feedback,
}

const IDENTIFICATION_PATTERNS: &[&str] = &["id", "question", "name", "identifier", "number"];
const TOPIC_PATTERNS: &[&str] = &["topic", "subject", "theme", "title", "content"];
const SCORE_INFO_PATTERNS: &[&str] = &["score", "points", "mark", "grade", "total", "maximum"];
const ANSWER_PATTERNS: &[&str] = &["answer", "response", "solution", "student"];
const BREAKDOWN_PATTERNS: &[&str] = &["breakdown", "rubric", "criteria", "grading", "elements"];
const FEEDBACK_PATTERNS: &[&str] = &["feedback", "comment", "review", "evaluation"];

impl KeyCategory {
    /// All categories, in the order they are tested.
    pub const ALL: [Self; 6] = [
        Self::Identification,
        Self::Topic,
        Self::ScoreInfo,
        Self::Answer,
        Self::Breakdown,
        Self::Feedback,
    ];

    /// Lowercase substring patterns owned by this category, in priority order.
    #[inline]
    #[must_use]
    pub const fn patterns(self) -> &'static [&'static str] {
        match self {
            Self::Identification => IDENTIFICATION_PATTERNS,
            Self::Topic => TOPIC_PATTERNS,
            Self::ScoreInfo => SCORE_INFO_PATTERNS,
            Self::Answer => ANSWER_PATTERNS,
            Self::Breakdown => BREAKDOWN_PATTERNS,
            Self::Feedback => FEEDBACK_PATTERNS,
        }
    }

    /// Stable snake_case name, as used in `inspect` output.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Identification => "identification",
            Self::Topic => "topic",
            Self::ScoreInfo => "score_info",
            Self::Answer => "answer",
            Self::Breakdown => "breakdown",
            Self::Feedback => "feedback",
        }
    }

    /// Whether an already-lowercased key name matches any of this category's patterns.
    #[inline]
    #[must_use]
    pub fn matches(self, key_lower: &str) -> bool {
        self.patterns()
            .iter()
            .any(|pattern| key_lower.contains(pattern))
    }
}

/// Keys of one record grouped by semantic role.
///
/// Within a category, keys keep the record's own key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyRoles {
    pub identification: Vec<String>,
    pub topic: Vec<String>,
    pub score_info: Vec<String>,
    pub answer: Vec<String>,
    pub breakdown: Vec<String>,
    pub feedback: Vec<String>,
}

impl KeyRoles {
    /// Keys assigned to `category`.
    #[inline]
    #[must_use]
    pub fn keys(&self, category: KeyCategory) -> &[String] {
        match category {
            KeyCategory::Identification => &self.identification,
            KeyCategory::Topic => &self.topic,
            KeyCategory::ScoreInfo => &self.score_info,
            KeyCategory::Answer => &self.answer,
            KeyCategory::Breakdown => &self.breakdown,
            KeyCategory::Feedback => &self.feedback,
        }
    }

    fn keys_mut(&mut self, category: KeyCategory) -> &mut Vec<String> {
        match category {
            KeyCategory::Identification => &mut self.identification,
            KeyCategory::Topic => &mut self.topic,
            KeyCategory::ScoreInfo => &mut self.score_info,
            KeyCategory::Answer => &mut self.answer,
            KeyCategory::Breakdown => &mut self.breakdown,
            KeyCategory::Feedback => &mut self.feedback,
        }
    }

    /// `true` when no key of the record matched any category.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        KeyCategory::ALL
            .iter()
            .all(|category| self.keys(*category).is_empty())
    }
}

/// Classify the keys of a single record.
///
/// Pure function of the record's key set; never fails. A record with no
/// matching keys yields all-empty category lists.
#[must_use]
pub fn classify(record: &RawRecord) -> KeyRoles {
    let mut roles = KeyRoles::default();

    for key in record.keys() {
        let key_lower = key.to_lowercase();
        for category in KeyCategory::ALL {
            if category.matches(&key_lower) {
                roles.keys_mut(category).push(key.clone());
            }
        }
    }

    log::trace!("classified {} keys: {roles:?}", record.len());
    roles
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_classify_conventional_keys() {
        let roles = classify(&record(json!({
            "question_id": "Q1",
            "topic": "Derivatives",
            "max_points": 20,
            "student_score": 16,
            "student_answer": "f'(x) = 2x",
            "grading_breakdown": [],
            "overall_feedback": "Good"
        })));

        assert_eq!(roles.identification, vec!["question_id"]);
        assert_eq!(roles.topic, vec!["topic"]);
        assert_eq!(roles.score_info, vec!["max_points", "student_score"]);
        assert_eq!(roles.answer, vec!["student_score", "student_answer"]);
        assert_eq!(roles.breakdown, vec!["grading_breakdown"]);
        assert_eq!(roles.feedback, vec!["overall_feedback"]);
    }

    #[test]
    fn test_key_in_several_categories() {
        let roles = classify(&record(json!({"evaluation_criteria": []})));
        assert_eq!(roles.breakdown, vec!["evaluation_criteria"]);
        assert_eq!(roles.feedback, vec!["evaluation_criteria"]);
        assert!(roles.identification.is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        let roles = classify(&record(json!({"QuestionNumber": 3, "TOPIC": "x"})));
        assert_eq!(roles.identification, vec!["QuestionNumber"]);
        assert_eq!(roles.topic, vec!["TOPIC"]);
    }

    #[test]
    fn test_key_added_once_per_category() {
        // "question_number" hits both "question" and "number"
        let roles = classify(&record(json!({"question_number": 1})));
        assert_eq!(roles.identification, vec!["question_number"]);
    }

    #[test]
    fn test_no_matching_keys() {
        let roles = classify(&record(json!({"foo": 1, "bar": "baz"})));
        assert!(roles.is_empty());
        assert_eq!(roles, KeyRoles::default());
    }

    #[test]
    fn test_record_order_preserved() {
        let roles = classify(&record(json!({"z_score": 1, "a_points": 2, "m_mark": 3})));
        assert_eq!(roles.score_info, vec!["z_score", "a_points", "m_mark"]);
    }

    #[test]
    fn test_category_names() {
        let names: Vec<_> = KeyCategory::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec!["identification", "topic", "score_info", "answer", "breakdown", "feedback"]
        );
    }
}
