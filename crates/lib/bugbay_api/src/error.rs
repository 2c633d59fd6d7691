//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use bugbay_core::auth::AuthError;
use bugbay_core::reports::ReportError;
use bugbay_core::reports::pagination::ParamIssue;
use bugbay_core::storage::StorageError;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type ApiResult<T> = Result<T, ApiError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid query parameters")]
    InvalidParams(Vec<ParamIssue>),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, details) = match &self {
            ApiError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone(), None),
            ApiError::InvalidParams(issues) => (
                StatusCode::BAD_REQUEST,
                "invalid query parameters".to_string(),
                serde_json::to_value(issues).ok(),
            ),
            ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone(), None),
            ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone(), None),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone(), None),
            ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone(), None),
            ApiError::Internal(detail) => {
                // Full detail goes to the log, never to the caller.
                error!(detail = %detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };
        let body = Json(ErrorResponse {
            error: message,
            details,
        });
        (status, body).into_response()
    }
}

impl From<ReportError> for ApiError {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::Validation(msg) => ApiError::Validation(msg),
            ReportError::Forbidden(msg) => ApiError::Forbidden(msg),
            ReportError::NotFound(msg) => ApiError::NotFound(msg),
            ReportError::Conflict(msg) => ApiError::Conflict(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::CredentialError => ApiError::Unauthorized("Invalid credentials".into()),
            AuthError::TokenError(msg) => ApiError::Unauthorized(msg),
            AuthError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Validation(msg) => ApiError::Validation(msg),
            StorageError::NotFound(msg) => ApiError::NotFound(msg),
            StorageError::Io(e) => ApiError::Internal(e.to_string()),
        }
    }
}
