//! Audit diff computation.
//!
//! Diffs are field-level old/new pairs over the updatable report fields.
//! An empty diff means the update is a no-op: no audit record, no
//! `updatedAt` bump.

use std::collections::BTreeMap;

use serde_json::json;

use crate::models::report::{FieldChange, Report, ReportPatch};

/// Compare a patch against the stored report, field by field. Only fields
/// whose proposed value actually differs appear in the result.
pub fn diff_fields(current: &Report, patch: &ReportPatch) -> BTreeMap<String, FieldChange> {
    let mut changes = BTreeMap::new();
    if let Some(title) = &patch.title
        && *title != current.title
    {
        changes.insert(
            "title".to_string(),
            FieldChange {
                old: json!(current.title),
                new: json!(title),
            },
        );
    }
    if let Some(description) = &patch.description
        && *description != current.description
    {
        changes.insert(
            "description".to_string(),
            FieldChange {
                old: json!(current.description),
                new: json!(description),
            },
        );
    }
    if let Some(severity) = patch.severity
        && severity != current.severity
    {
        changes.insert(
            "severity".to_string(),
            FieldChange {
                old: json!(current.severity.as_str()),
                new: json!(severity.as_str()),
            },
        );
    }
    changes
}
