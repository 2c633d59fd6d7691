//! # bugbay_api
//!
//! HTTP API library for Bugbay.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use bugbay_core::auth::users::UserDirectory;
use bugbay_core::notify::Notifier;
use bugbay_core::reports::repository::ReportRepository;
use bugbay_core::storage::FileStore;

use crate::config::ApiConfig;
use crate::handlers::{attachments, audit, auth, entries, reports};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Lock-guarded report store.
    pub repo: Arc<ReportRepository>,
    /// Byte-storage collaborator for attachment content.
    pub files: Arc<FileStore>,
    /// Read-only user directory.
    pub users: Arc<UserDirectory>,
    /// Best-effort notification sink.
    pub notifier: Arc<dyn Notifier>,
    /// API configuration.
    pub config: ApiConfig,
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Generous margin over the raw file size for multipart framing.
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes as usize + 64 * 1024);

    // Public routes: login, and the download path whose only access
    // control is the capability token in the query string.
    let public = Router::new()
        .route("/auth/login", post(auth::login_handler))
        .route(
            "/reports/{id}/attachments/{filename}",
            get(attachments::download_attachment_handler),
        );

    // Protected routes (require a session token).
    let protected = Router::new()
        .route(
            "/reports",
            get(reports::list_reports_handler).post(reports::create_report_handler),
        )
        .route(
            "/reports/{id}",
            get(reports::get_report_handler)
                .patch(reports::update_report_handler)
                .delete(reports::delete_report_handler),
        )
        .route(
            "/reports/{id}/entries",
            get(entries::list_entries_handler).post(entries::add_entry_handler),
        )
        .route(
            "/reports/{id}/attachments",
            post(attachments::upload_attachment_handler),
        )
        .route("/reports/{id}/audit", get(audit::list_audit_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(body_limit)
        .layer(cors)
        .with_state(state)
}
