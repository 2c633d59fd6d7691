//! Capability-token issuance and verification for attachment downloads.
//!
//! The download URL is the only access control on the download path; the
//! `Authorization` header is deliberately ignored there. Verification is
//! ordered cheapest-and-safest first: cryptographic check, then scope
//! comparison, then repository existence — a forged token never learns
//! whether the file exists.

use url::Url;

use bugbay_core::auth::token::{issue_capability_token, verify_capability_token};
use bugbay_core::models::report::Attachment;

use crate::AppState;
use crate::error::{ApiError, ApiResult};

/// Mint a fully qualified download URL embedding a fresh 15-minute
/// capability token scoped to exactly `(report_id, filename)`.
pub fn mint_download_url(state: &AppState, report_id: u64, filename: &str) -> ApiResult<String> {
    let token = issue_capability_token(report_id, filename, state.config.auth_secret.as_bytes())?;
    let mut url = Url::parse(&state.config.base_url)
        .map_err(|e| ApiError::Internal(format!("invalid base url: {e}")))?;
    url.set_path(&format!("/reports/{report_id}/attachments/{filename}"));
    url.query_pairs_mut().append_pair("token", &token);
    Ok(url.to_string())
}

/// Validate a download request against the requested path.
///
/// 1. Codec failure (bad signature, malformed, expired) ⇒ `Unauthorized`.
/// 2. Scope mismatch against `(report_id, filename)` ⇒ `Forbidden` — the
///    token is structurally valid but names a different file.
/// 3. Report or attachment gone ⇒ `NotFound`.
pub fn verify_download(
    state: &AppState,
    report_id: u64,
    filename: &str,
    token: Option<&str>,
) -> ApiResult<Attachment> {
    let token =
        token.ok_or_else(|| ApiError::Unauthorized("Missing download token".into()))?;
    let claims = verify_capability_token(token, state.config.auth_secret.as_bytes())
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired download token".into()))?;

    if claims.report_id != report_id || claims.file != filename {
        return Err(ApiError::Forbidden(
            "download token is not valid for this file".into(),
        ));
    }

    let report = state
        .repo
        .get(report_id)
        .ok_or_else(|| ApiError::NotFound(format!("report {report_id}")))?;
    let attachment = report
        .attachment(filename)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("attachment {filename}")))?;
    Ok(attachment)
}
