//! API wire models (camelCase), kept separate from the domain models in
//! `bugbay_core::models`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use bugbay_core::models::auth::Role;
use bugbay_core::models::report::{
    Attachment, AuditRecord, Entry, FieldChange, Report, Severity,
};
use bugbay_core::reports::pagination::SortOrder;

/// Error envelope: `{error, details?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
    pub token_type: String,
    pub user: AuthUser,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReportRequest {
    pub title: String,
    pub description: String,
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReportRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<Severity>,
}

/// Report summary: the list/create/update response shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub created_at: String,
    pub updated_at: String,
    pub entry_count: usize,
    pub severity_score: u8,
}

impl ReportSummary {
    pub fn from_report(report: &Report) -> Self {
        Self {
            id: report.id,
            title: report.title.clone(),
            description: report.description.clone(),
            severity: report.severity,
            created_at: report.created_at.to_rfc3339(),
            updated_at: report.updated_at.to_rfc3339(),
            entry_count: report.entries.len(),
            severity_score: report.severity.score(),
        }
    }
}

/// Expanded view: summary plus nested entries and attachments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetail {
    #[serde(flatten)]
    pub summary: ReportSummary,
    pub entries: Vec<EntryView>,
    pub attachments: Vec<AttachmentView>,
}

impl ReportDetail {
    pub fn from_report(report: &Report) -> Self {
        Self {
            summary: ReportSummary::from_report(report),
            entries: report.entries.iter().map(EntryView::from_entry).collect(),
            attachments: report
                .attachments
                .iter()
                .map(AttachmentView::from_attachment)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryView {
    pub id: u64,
    pub author: String,
    pub comment: String,
    pub created_at: String,
}

impl EntryView {
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            id: entry.id,
            author: entry.author.clone(),
            comment: entry.comment.clone(),
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentView {
    pub filename: String,
    pub original_name: String,
    pub mimetype: String,
    pub size: u64,
    pub uploaded_at: String,
}

impl AttachmentView {
    pub fn from_attachment(attachment: &Attachment) -> Self {
        Self {
            filename: attachment.filename.clone(),
            original_name: attachment.original_name.clone(),
            mimetype: attachment.mimetype.clone(),
            size: attachment.size,
            uploaded_at: attachment.uploaded_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEntryRequest {
    pub comment: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPageResponse {
    pub entries: Vec<EntryView>,
    pub page: u64,
    pub page_size: u64,
    pub total: usize,
    pub order: SortOrder,
}

// ---------------------------------------------------------------------------
// Attachments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub download_url: String,
}

// ---------------------------------------------------------------------------
// Audit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecordView {
    pub report_id: u64,
    pub user_id: String,
    pub changes: BTreeMap<String, FieldChange>,
    pub timestamp: String,
}

impl AuditRecordView {
    pub fn from_record(record: &AuditRecord) -> Self {
        Self {
            report_id: record.report_id,
            user_id: record.user_id.clone(),
            changes: record.changes.clone(),
            timestamp: record.timestamp.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditListResponse {
    pub records: Vec<AuditRecordView>,
}
