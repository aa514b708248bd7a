//! Diagnostic view of how an input is interpreted.
//!
//! Useful when a report comes out with default values: it shows which keys
//! were assigned to which role and what each canonical field resolved to.

use crate::breakdown::{analyze, BreakdownColumns, BreakdownStructure};
use crate::classifier::{classify, KeyRoles};
use crate::document::normalize_input;
use crate::error::Result;
use crate::extractor::{extract, CanonicalQuestionInfo};
use crate::value::FieldValue;
use serde::Serialize;
use serde_json::Value;

/// Interpretation of a whole input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inspection {
    /// Roles inferred from the first record and applied to all of them.
    pub roles: KeyRoles,
    pub records: Vec<RecordInspection>,
}

/// Interpretation of one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordInspection {
    pub info: CanonicalQuestionInfo,
    pub breakdown_structure: BreakdownStructure,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown_columns: Option<BreakdownColumns>,
}

/// Inspect `input` without building a document.
///
/// # Errors
///
/// [`crate::ReportError::InputShape`] for null, empty or scalar input, and
/// [`crate::ReportError::MalformedContent`] for records that are not mappings.
pub fn inspect(input: &Value) -> Result<Inspection> {
    let records = normalize_input(input)?;
    let roles = records.first().map_or_else(KeyRoles::default, |first| classify(first));

    let records = records
        .iter()
        .map(|record| {
            let info = extract(record, &roles);
            let breakdown_structure = analyze(&info.grading_breakdown);
            let breakdown_columns = match info.grading_breakdown.first().map(FieldValue::of) {
                Some(FieldValue::Mapping(first)) => {
                    Some(BreakdownColumns::resolve(&breakdown_structure, first))
                }
                _ => None,
            };
            RecordInspection {
                info,
                breakdown_structure,
                breakdown_columns,
            }
        })
        .collect();

    Ok(Inspection { roles, records })
}
