//! Attachment upload and download handlers.

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Deserialize;
use tracing::warn;

use bugbay_core::models::report::Attachment;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::UploadResponse;
use crate::services::downloads;

/// `POST /reports/{id}/attachments` — multipart upload of one `file`
/// field. On success the response carries a download URL embedding a
/// fresh capability token.
pub async fn upload_attachment_handler(
    State(state): State<AppState>,
    axum::Extension(_user): axum::Extension<AuthenticatedUser>,
    Path(report_id): Path<u64>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    if state.repo.get(report_id).is_none() {
        return Err(ApiError::NotFound(format!("report {report_id}")));
    }

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let original_name = field.file_name().unwrap_or("upload").to_string();
            let mimetype = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(format!("failed to read upload: {e}")))?;
            upload = Some((original_name, mimetype, bytes));
            break;
        }
    }
    let (original_name, mimetype, bytes) =
        upload.ok_or_else(|| ApiError::Validation("missing 'file' field".into()))?;

    // Bytes hit disk first; the metadata append can still fail if the
    // report was deleted concurrently, in which case we roll back.
    let filename = state.files.store(&bytes, &mimetype).await?;
    let attachment = Attachment {
        filename: filename.clone(),
        original_name,
        mimetype,
        size: bytes.len() as u64,
        uploaded_at: Utc::now(),
    };
    if let Err(e) = state.repo.add_attachment(report_id, attachment) {
        if let Err(del) = state.files.delete(&filename).await {
            warn!(filename = %filename, error = %del, "upload rollback failed");
        }
        return Err(e.into());
    }

    let download_url = downloads::mint_download_url(&state, report_id, &filename)?;
    Ok((StatusCode::CREATED, Json(UploadResponse { download_url })))
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub token: Option<String>,
}

/// `GET /reports/{id}/attachments/{filename}` — anonymous download,
/// gated solely by the `token` query parameter.
pub async fn download_attachment_handler(
    State(state): State<AppState>,
    Path((report_id, filename)): Path<(u64, String)>,
    Query(query): Query<DownloadQuery>,
) -> ApiResult<Response> {
    let attachment =
        downloads::verify_download(&state, report_id, &filename, query.token.as_deref())?;
    let bytes = state.files.retrieve(&filename).await?;
    Ok((
        [
            (CONTENT_TYPE, attachment.mimetype),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", attachment.original_name),
            ),
        ],
        bytes,
    )
        .into_response())
}
