//! Authentication request handlers.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::error::ApiResult;
use crate::models::{LoginRequest, LoginResponse};
use crate::services::auth;

/// `POST /auth/login` — authenticate with username + password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let resp = auth::login(
        &state.users,
        &body.username,
        &body.password,
        state.config.auth_secret.as_bytes(),
    )?;
    Ok(Json(resp))
}
