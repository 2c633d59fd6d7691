//! Authentication middleware — Bearer token extraction and verification.

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use bugbay_core::auth::token::verify_session_token;
use bugbay_core::models::auth::SessionClaims;

use crate::AppState;
use crate::error::ApiError;

/// Key used to store `SessionClaims` in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub SessionClaims);

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies the
/// session token, and injects `AuthenticatedUser` into request extensions.
///
/// Missing header, wrong scheme, bad signature, and expiry all collapse to
/// the same `Unauthorized` so callers learn nothing about which check
/// failed.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing or invalid credentials".into()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Missing or invalid credentials".into()))?;

    let claims = verify_session_token(token, state.config.auth_secret.as_bytes())
        .ok_or_else(|| ApiError::Unauthorized("Missing or invalid credentials".into()))?;

    request.extensions_mut().insert(AuthenticatedUser(claims));

    Ok(next.run(request).await)
}
