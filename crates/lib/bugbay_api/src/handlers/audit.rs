//! Audit trail handlers.

use axum::Json;
use axum::extract::{Path, State};

use bugbay_core::models::auth::Role;
use bugbay_core::reports::rules;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{AuditListResponse, AuditRecordView};

/// `GET /reports/{id}/audit` — admin-only listing of a report's audit
/// records, oldest first.
pub async fn list_audit_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(report_id): Path<u64>,
) -> ApiResult<Json<AuditListResponse>> {
    rules::require_role(user.0.role, &[Role::Admin])?;
    if state.repo.get(report_id).is_none() {
        return Err(ApiError::NotFound(format!("report {report_id}")));
    }
    let records = state
        .repo
        .audit_for_report(report_id)
        .iter()
        .map(AuditRecordView::from_record)
        .collect();
    Ok(Json(AuditListResponse { records }))
}
