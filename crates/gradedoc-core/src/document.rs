//! Report document model and assembly.
//!
//! [`assemble`] turns a raw JSON input into a [`ReportDocument`]: it
//! normalizes the input shape, classifies the keys of the first record,
//! extracts canonical fields from every record and builds one [`Section`]
//! per record. All text stored in the model is markup (see
//! [`crate::markup`]); free text from the input is escaped on the way in.

use crate::breakdown::{analyze, BreakdownColumns};
use crate::classifier::{classify, KeyRoles};
use crate::error::{ReportError, Result};
use crate::extractor::{extract, CanonicalQuestionInfo};
use crate::labels::Labels;
use crate::markup::{bold, escape_markup};
use crate::value::{number_as_f64, FieldValue, RawRecord};
use serde::Serialize;
use serde_json::{Number, Value};

/// Name of the wrapper field that may hold the record list.
pub const CORRECTIONS_FIELD: &str = "corrections";

/// A complete report: a title followed by one section per graded question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    pub title: String,
    pub sections: Vec<Section>,
}

/// One label/value line of a section's info block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoRow {
    pub label: String,
    pub value: String,
}

/// Rubric breakdown rendered as a four-column table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownTable {
    pub heading: String,
    pub header: [String; 4],
    pub rows: Vec<[String; 4]>,
}

/// Everything shown for one graded question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub header: String,
    pub info: Vec<InfoRow>,
    pub answer_heading: String,
    /// Non-blank answer lines, one paragraph each.
    pub answer: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<BreakdownTable>,
    pub feedback_heading: String,
    pub feedback: String,
}

/// Percentage of `score` over `max`, or `None` when `max <= 0`.
#[must_use]
pub fn percentage(score: &Number, max: &Number) -> Option<f64> {
    let max = number_as_f64(max);
    if max > 0.0 {
        Some(number_as_f64(score) / max * 100.0)
    } else {
        None
    }
}

/// Percentage with one decimal and a trailing `%`, e.g. `50.0%`.
#[inline]
#[must_use]
pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

/// Resolve the list of records implied by the input shape.
///
/// - a mapping with a list-valued `corrections` field: that list
/// - any other mapping: a one-record list
/// - a list: used as-is
///
/// # Errors
///
/// [`ReportError::InputShape`] for null or empty input and scalars.
/// [`ReportError::MalformedContent`] when a record of a non-empty list is not
/// a mapping; that is a render failure, so the plain fallback still applies.
pub fn normalize_input(input: &Value) -> Result<Vec<&RawRecord>> {
    let items: Vec<&Value> = match input {
        Value::Null => return Err(ReportError::InputShape("No data provided".to_string())),
        Value::Object(map) if map.is_empty() => {
            return Err(ReportError::InputShape("No data provided".to_string()))
        }
        Value::Array(items) if items.is_empty() => {
            return Err(ReportError::InputShape("No data provided".to_string()))
        }
        Value::Object(map) => match map.get(CORRECTIONS_FIELD) {
            Some(Value::Array(items)) => items.iter().collect(),
            _ => vec![input],
        },
        Value::Array(items) => items.iter().collect(),
        other => {
            return Err(ReportError::InputShape(format!(
                "unsupported input type: {}; expected a mapping or a list of mappings",
                kind_of(other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(ReportError::MalformedContent(format!(
                "record {index} is a {}, expected a mapping",
                kind_of(other)
            ))),
        })
        .collect()
}

/// Build the report document for `input`.
///
/// Key roles are inferred from the first record only and reused for the
/// whole batch; records shaped differently fall back to default values.
///
/// # Errors
///
/// [`ReportError::InputShape`] from [`normalize_input`], and
/// [`ReportError::MalformedContent`] when a record or a breakdown entry is
/// not a mapping.
pub fn assemble(input: &Value, labels: &Labels) -> Result<ReportDocument> {
    let records = normalize_input(input)?;
    let roles = records.first().map_or_else(KeyRoles::default, |first| classify(first));
    log::debug!("assembling {} record(s) with roles {roles:?}", records.len());

    let sections = records
        .iter()
        .map(|record| build_section(&extract(record, &roles), labels))
        .collect::<Result<Vec<_>>>()?;

    Ok(ReportDocument {
        title: escape_markup(labels.title),
        sections,
    })
}

/// Build the section for one canonical question.
///
/// # Errors
///
/// [`ReportError::MalformedContent`] when a breakdown entry is not a mapping.
pub fn build_section(info: &CanonicalQuestionInfo, labels: &Labels) -> Result<Section> {
    let mut rows = vec![
        InfoRow {
            label: escape_markup(labels.topic),
            value: escape_markup(&info.topic),
        },
        InfoRow {
            label: escape_markup(labels.max_points),
            value: info.max_points.to_string(),
        },
        InfoRow {
            label: escape_markup(labels.student_score),
            value: info.student_score.to_string(),
        },
    ];
    if let Some(value) = percentage(&info.student_score, &info.max_points) {
        rows.push(InfoRow {
            label: escape_markup(labels.percentage),
            value: format_percentage(value),
        });
    }

    let answer = info
        .student_answer
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(escape_markup)
        .collect();

    let breakdown = if info.grading_breakdown.is_empty() {
        None
    } else {
        Some(build_breakdown_table(&info.grading_breakdown, labels)?)
    };

    Ok(Section {
        header: format!(
            "{} {}",
            escape_markup(labels.question),
            escape_markup(&info.question_id)
        ),
        info: rows,
        answer_heading: escape_markup(labels.answer_heading),
        answer,
        breakdown,
        feedback_heading: escape_markup(labels.feedback_heading),
        feedback: escape_markup(&info.overall_feedback),
    })
}

fn build_breakdown_table(entries: &[Value], labels: &Labels) -> Result<BreakdownTable> {
    let records = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| match FieldValue::of(entry) {
            FieldValue::Mapping(record) => Ok(record),
            _ => Err(ReportError::MalformedContent(format!(
                "breakdown entry {index} is a {}, expected a mapping",
                kind_of(entry)
            ))),
        })
        .collect::<Result<Vec<&RawRecord>>>()?;

    let structure = analyze(entries);
    // `entries` is non-empty and every entry is a mapping at this point
    let columns = BreakdownColumns::resolve(&structure, records[0]);
    log::debug!("breakdown columns: {columns:?}");

    let rows = records
        .iter()
        .map(|record| {
            columns.ordered().map(|key| {
                record
                    .get(key)
                    .map(|value| escape_markup(&FieldValue::of(value).to_display_string()))
                    .unwrap_or_default()
            })
        })
        .collect();

    Ok(BreakdownTable {
        heading: escape_markup(labels.breakdown_heading),
        header: [
            bold(&escape_markup(labels.criterion_column)),
            bold(&escape_markup(labels.max_points_column)),
            bold(&escape_markup(labels.score_column)),
            bold(&escape_markup(labels.justification_column)),
        ],
        rows,
    })
}
