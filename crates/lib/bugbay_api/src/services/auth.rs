//! Login flow — credential check plus session-token minting.

use bugbay_core::auth::token::{SESSION_TOKEN_TTL_SECS, issue_session_token};
use bugbay_core::auth::users::UserDirectory;

use crate::error::ApiResult;
use crate::models::{AuthUser, LoginResponse};

/// Authenticate a username/password pair and mint a 1-hour session token.
/// Unknown user and wrong password surface identically as `Unauthorized`.
pub fn login(
    users: &UserDirectory,
    username: &str,
    password: &str,
    secret: &[u8],
) -> ApiResult<LoginResponse> {
    let identity = users.authenticate(username, password)?;
    let token = issue_session_token(&identity, secret)?;
    Ok(LoginResponse {
        token,
        expires_in: SESSION_TOKEN_TTL_SECS,
        token_type: "Bearer".to_string(),
        user: AuthUser {
            id: identity.id,
            username: username.to_string(),
            role: identity.role,
        },
    })
}
