//! Report request handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::warn;

use bugbay_core::models::auth::Role;
use bugbay_core::models::report::{NewReport, ReportPatch};
use bugbay_core::reports::rules;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    CreateReportRequest, DeleteResponse, ReportDetail, ReportSummary, UpdateReportRequest,
};

/// `GET /reports` — list all reports as summaries.
pub async fn list_reports_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ReportSummary>>> {
    let summaries = state
        .repo
        .list()
        .iter()
        .map(ReportSummary::from_report)
        .collect();
    Ok(Json(summaries))
}

/// `POST /reports` — create a report. Fires a best-effort notification
/// whose failure never affects the response.
pub async fn create_report_handler(
    State(state): State<AppState>,
    axum::Extension(_user): axum::Extension<AuthenticatedUser>,
    Json(body): Json<CreateReportRequest>,
) -> ApiResult<(StatusCode, Json<ReportSummary>)> {
    let report = state.repo.create(NewReport {
        title: body.title,
        description: body.description,
        severity: body.severity,
    })?;

    let notifier = state.notifier.clone();
    let (report_id, title) = (report.id, report.title.clone());
    tokio::spawn(async move {
        if let Err(e) = notifier.report_created(report_id, &title).await {
            warn!(report_id, error = %e, "creation notification failed");
        }
    });

    Ok((StatusCode::CREATED, Json(ReportSummary::from_report(&report))))
}

/// `GET /reports/{id}` — expanded view with entries and attachments.
pub async fn get_report_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Json<ReportDetail>> {
    let report = state
        .repo
        .get(id)
        .ok_or_else(|| ApiError::NotFound(format!("report {id}")))?;
    Ok(Json(ReportDetail::from_report(&report)))
}

/// `PATCH /reports/{id}` — partial update. The severity-escalation rule
/// and the audit diff both run inside the repository's critical section.
pub async fn update_report_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<u64>,
    Json(body): Json<UpdateReportRequest>,
) -> ApiResult<Json<ReportSummary>> {
    let patch = ReportPatch {
        title: body.title,
        description: body.description,
        severity: body.severity,
    };
    let (report, _) = state.repo.update(id, patch, &user.0.identity())?;
    Ok(Json(ReportSummary::from_report(&report)))
}

/// `DELETE /reports/{id}` — admin only. Hard removal; stored attachment
/// bytes are cleaned up best-effort in the background.
pub async fn delete_report_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(id): Path<u64>,
) -> ApiResult<Json<DeleteResponse>> {
    rules::require_role(user.0.role, &[Role::Admin])?;
    let report = state.repo.delete(id)?;

    let files = state.files.clone();
    tokio::spawn(async move {
        for attachment in report.attachments {
            if let Err(e) = files.delete(&attachment.filename).await {
                warn!(filename = %attachment.filename, error = %e, "attachment cleanup failed");
            }
        }
    });

    Ok(Json(DeleteResponse { success: true }))
}
