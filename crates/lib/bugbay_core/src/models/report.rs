//! Report domain models.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Report severity. Ordering follows the derived score (low < critical).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Derived numeric score: low 1, medium 2, high 3, critical 4.
    pub fn score(&self) -> u8 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
            Severity::Critical => 4,
        }
    }

    /// Stable lowercase name, matching the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Low
    }
}

/// A bug report. Owned exclusively by the repository; every instance
/// handed out is a defensive clone.
#[derive(Debug, Clone)]
pub struct Report {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub entries: Vec<Entry>,
    pub attachments: Vec<Attachment>,
    /// Next entry id within this report. Entry ids never repeat even
    /// though entries are append-only today.
    pub next_entry_id: u64,
}

impl Report {
    /// Look up an attachment by its opaque stored filename.
    pub fn attachment(&self, filename: &str) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.filename == filename)
    }
}

/// Append-only comment entry on a report. Never mutated or deleted.
#[derive(Debug, Clone)]
pub struct Entry {
    pub id: u64,
    pub author: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Attachment metadata. Byte content lives in the byte-storage
/// collaborator, reachable only by the opaque `filename` key.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub original_name: String,
    pub mimetype: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// Old/new value pair for one changed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub old: serde_json::Value,
    pub new: serde_json::Value,
}

/// Immutable audit record: who changed what and when. Appended once per
/// effective mutation, never edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub report_id: u64,
    pub user_id: String,
    pub changes: BTreeMap<String, FieldChange>,
    pub timestamp: DateTime<Utc>,
}

/// Input for report creation.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub title: String,
    pub description: String,
    pub severity: Option<Severity>,
}

/// Partial update for a report. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ReportPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<Severity>,
}

impl ReportPatch {
    /// True when the patch names no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.severity.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_scores_are_fixed() {
        assert_eq!(Severity::Low.score(), 1);
        assert_eq!(Severity::Medium.score(), 2);
        assert_eq!(Severity::High.score(), 3);
        assert_eq!(Severity::Critical.score(), 4);
    }

    #[test]
    fn severity_default_is_low() {
        assert_eq!(Severity::default(), Severity::Low);
    }

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(Severity::Critical).unwrap(),
            serde_json::json!("critical")
        );
    }
}
