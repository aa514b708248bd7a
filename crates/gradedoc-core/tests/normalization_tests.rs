//! Normalization Tests
//!
//! End-to-end checks of shape normalization, role inference and section
//! assembly on realistic grading payloads.

use gradedoc_core::{
    assemble, classify, extract, normalize_input, plain_text, Labels, ReportDocument, ReportError,
    Section,
};
use serde_json::{json, Number, Value};

fn english(input: &Value) -> ReportDocument {
    assemble(input, &Labels::english()).expect("assembly should succeed")
}

fn info_value<'a>(section: &'a Section, label: &str) -> Option<&'a str> {
    section
        .info
        .iter()
        .find(|row| row.label == label)
        .map(|row| row.value.as_str())
}

fn end_to_end_input() -> Value {
    json!([{
        "q_id": "P1",
        "subject_area": "Math",
        "max_marks": 10,
        "response": "ans",
        "evaluation_criteria": [{
            "criterion": "c",
            "max_score": 5,
            "points_awarded": 5,
            "comments": "fine"
        }],
        "final_score": 5,
        "general_comments": "ok"
    }])
}

// ============================================================================
// End-to-end
// ============================================================================

#[test]
fn test_end_to_end_section() {
    let doc = english(&end_to_end_input());
    assert_eq!(doc.sections.len(), 1);

    let section = &doc.sections[0];
    assert_eq!(section.header, "Question: P1");
    assert_eq!(info_value(section, "Topic:"), Some("Math"));
    assert_eq!(info_value(section, "Maximum points:"), Some("10"));
    assert_eq!(info_value(section, "Student score:"), Some("5"));
    assert_eq!(info_value(section, "Percentage:"), Some("50.0%"));
    assert_eq!(section.answer, vec!["ans"]);
    assert_eq!(section.feedback, "ok");

    let table = section.breakdown.as_ref().expect("breakdown table");
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0], ["c", "5", "5", "fine"].map(String::from));
}

#[test]
fn test_french_labels_by_default() {
    let doc = assemble(&end_to_end_input(), &Labels::default()).unwrap();
    let section = &doc.sections[0];
    assert_eq!(doc.title, "Rapport d'évaluation généré par l'IA");
    assert_eq!(section.header, "Question : P1");
    assert_eq!(info_value(section, "Pourcentage :"), Some("50.0%"));
    let header: Vec<String> = section
        .breakdown
        .as_ref()
        .unwrap()
        .header
        .iter()
        .map(|cell| plain_text(cell).unwrap())
        .collect();
    assert_eq!(header, vec!["Critère", "Points max", "Score", "Justification"]);
}

// ============================================================================
// Shape normalization
// ============================================================================

#[test]
fn test_shapes_yield_one_section_per_record() {
    let a = json!({"question_id": "A", "topic": "ta"});
    let b = json!({"question_id": "B", "topic": "tb"});

    let wrapped = english(&json!({"corrections": [a.clone(), b.clone()]}));
    let listed = english(&json!([a.clone(), b]));
    let single = english(&a);

    assert_eq!(wrapped.sections.len(), 2);
    assert_eq!(listed.sections.len(), 2);
    assert_eq!(single.sections.len(), 1);
    assert_eq!(wrapped, listed);
    assert_eq!(single.sections[0].header, "Question: A");
}

#[test]
fn test_fatal_shapes() {
    for input in [json!(null), json!([]), json!({}), json!(3.5), json!(true)] {
        let err = assemble(&input, &Labels::english()).unwrap_err();
        assert!(
            matches!(err, ReportError::InputShape(_)),
            "{input} should be an input shape error, got {err}"
        );
    }
}

#[test]
fn test_non_mapping_records_are_malformed_content() {
    for input in [
        json!([1, 2]),
        json!({"corrections": ["oops"]}),
        json!([{"question_id": "Q1"}, "oops"]),
    ] {
        let err = assemble(&input, &Labels::english()).unwrap_err();
        assert!(
            matches!(err, ReportError::MalformedContent(_)),
            "{input} should be malformed content, got {err}"
        );
    }
}

#[test]
fn test_records_keep_input_order() {
    let doc = english(&json!([
        {"question_id": "3"},
        {"question_id": "1"},
        {"question_id": "2"}
    ]));
    let headers: Vec<&str> = doc.sections.iter().map(|s| s.header.as_str()).collect();
    assert_eq!(headers, vec!["Question: 3", "Question: 1", "Question: 2"]);
}

// ============================================================================
// Field resolution
// ============================================================================

#[test]
fn test_default_tuple() {
    let input = json!({"foo": 1, "bar": [1, 2], "baz": {"x": "y"}});
    let records = normalize_input(&input).unwrap();
    let info = extract(records[0], &classify(records[0]));

    assert_eq!(info.question_id, "Unknown Question");
    assert_eq!(info.topic, "No Topic");
    assert_eq!(info.max_points, Number::from(0));
    assert_eq!(info.student_score, Number::from(0));
    assert_eq!(info.student_answer, "No answer provided");
    assert!(info.grading_breakdown.is_empty());
    assert_eq!(info.overall_feedback, "No feedback provided");
}

#[test]
fn test_numeric_resolver_string_and_number() {
    let input = json!({"max_score": "10 points", "student_score": 7});
    let records = normalize_input(&input).unwrap();
    let info = extract(records[0], &classify(records[0]));
    assert_eq!(info.max_points.as_f64(), Some(10.0));
    assert_eq!(info.student_score, Number::from(7));

    let doc = english(&input);
    assert_eq!(info_value(&doc.sections[0], "Percentage:"), Some("70.0%"));
}

#[test]
fn test_percentage_omitted_without_max_points() {
    for max in [json!(0), json!(-5), json!("none")] {
        let doc = english(&json!({"max_points": max, "student_score": 3}));
        assert_eq!(
            info_value(&doc.sections[0], "Percentage:"),
            None,
            "max_points {max} must not produce a percentage"
        );
    }
}

#[test]
fn test_percentage_rounding() {
    let doc = english(&json!({"max_points": 3, "student_score": 2}));
    assert_eq!(info_value(&doc.sections[0], "Percentage:"), Some("66.7%"));
}

#[test]
fn test_numeric_id_wins_over_later_text_key() {
    let doc = english(&json!([{
        "question_number": 1,
        "question": "What is 2+2?",
        "student_answer": "4"
    }]));
    assert_eq!(doc.sections[0].header, "Question: 1");
}

#[test]
fn test_escaping_of_answer() {
    let doc = english(&json!({"answer": "<b>cheat</b> & win"}));
    let paragraph = &doc.sections[0].answer[0];
    assert_eq!(paragraph, "&lt;b&gt;cheat&lt;/b&gt; &amp; win");
    assert_eq!(plain_text(paragraph).unwrap(), "<b>cheat</b> & win");
}

#[test]
fn test_heterogeneous_batch_degrades_to_defaults() {
    let doc = english(&json!([
        {"question_id": "Q1", "student_answer": "a", "max_points": 2, "student_score": 1},
        {"id": "Q2", "response": "b", "points_possible": 4}
    ]));
    let second = &doc.sections[1];
    assert_eq!(second.header, "Question: Unknown Question");
    assert_eq!(second.answer, vec!["No answer provided"]);
    assert_eq!(info_value(second, "Maximum points:"), Some("0"));
}

#[test]
fn test_complex_french_payload() {
    let input = json!({
        "corrections": [{
            "question_id": "Question 1",
            "topic": "Calcul différentiel - Dérivées",
            "max_points": 20,
            "student_score": 16,
            "student_answer": "Soit f(x) = x^3 - 3x^2 + 5x - 2.\n\nDonc f'(x) = 3x^2 - 6x + 5.",
            "grading_breakdown": [
                {
                    "element": "Calcul de la dérivée f'(x)",
                    "max_points": 6,
                    "score": 6,
                    "justification": "La dérivée est parfaitement calculée."
                },
                {
                    "element": "Résolution de f'(x) = 0",
                    "max_points": 5,
                    "score": 4,
                    "justification": "Le discriminant est correct (Δ < 0)."
                }
            ],
            "overall_feedback": "Bon travail."
        }],
        "total_score": 16
    });

    let doc = english(&input);
    let section = &doc.sections[0];
    assert_eq!(section.header, "Question: Question 1");
    assert_eq!(info_value(section, "Percentage:"), Some("80.0%"));
    // `student_score` is the first answer-like key and holds a scalar
    assert_eq!(section.answer, vec!["16"]);
    let table = section.breakdown.as_ref().unwrap();
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[1][2], "4");
    assert_eq!(table.rows[1][3], "Le discriminant est correct (Δ &lt; 0).");
}
