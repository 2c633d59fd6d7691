//! Entry (comment) request handlers.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use bugbay_core::reports::pagination::parse_entry_page;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{CreateEntryRequest, EntryPageResponse, EntryView};

/// `POST /reports/{id}/entries` — append a comment entry. The author is
/// always the authenticated caller.
pub async fn add_entry_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(report_id): Path<u64>,
    Json(body): Json<CreateEntryRequest>,
) -> ApiResult<(StatusCode, Json<EntryView>)> {
    let entry = state
        .repo
        .add_entry(report_id, &user.0.sub, &body.comment)?;
    Ok((StatusCode::CREATED, Json(EntryView::from_entry(&entry))))
}

/// `GET /reports/{id}/entries` — paginated listing, sorted by `createdAt`.
///
/// Query params are taken raw so that non-numeric `page`/`pageSize` values
/// produce the structured validation envelope rather than a bare 400.
pub async fn list_entries_handler(
    State(state): State<AppState>,
    Path(report_id): Path<u64>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<EntryPageResponse>> {
    let page = parse_entry_page(
        params.get("page").map(String::as_str),
        params.get("pageSize").map(String::as_str),
        params.get("order").map(String::as_str),
    )
    .map_err(ApiError::InvalidParams)?;

    let slice = state.repo.entries_page(report_id, &page)?;
    Ok(Json(EntryPageResponse {
        entries: slice.entries.iter().map(EntryView::from_entry).collect(),
        page: page.page,
        page_size: page.page_size,
        total: slice.total,
        order: page.order,
    }))
}
