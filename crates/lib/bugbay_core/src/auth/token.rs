//! Token codec — signing and verification for session and capability
//! tokens (HS256, absolute expiry, no refresh).
//!
//! Both token kinds go through the same generic `sign`/`verify` pair; the
//! claims structs differ. A single process-wide secret signs everything:
//! rotating it invalidates all outstanding tokens, which is the documented
//! trade-off of keeping the service session-state-free.

use std::path::PathBuf;

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use super::AuthError;
use crate::models::auth::{CapabilityClaims, Identity, SessionClaims};

/// Session token lifetime: 1 hour.
pub const SESSION_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Capability (download) token lifetime: 15 minutes.
pub const CAPABILITY_TOKEN_TTL_SECS: i64 = 15 * 60;

/// Sign a claim set. The claims struct must carry its own `exp` field;
/// expiry is absolute and never renewed.
pub fn sign<C: Serialize>(claims: &C, secret: &[u8]) -> Result<String, AuthError> {
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret))
        .map_err(|e| AuthError::TokenError(format!("jwt encode: {e}")))
}

/// Verify a token, returning the claims on success. Signature mismatch,
/// structural malformation, and elapsed expiry all collapse to `None`.
pub fn verify<C: DeserializeOwned>(token: &str, secret: &[u8]) -> Option<C> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::default();
    validation.validate_exp = true;
    decode::<C>(token, &key, &validation).ok().map(|data| data.claims)
}

/// Mint a session token for a freshly authenticated identity (1 h expiry).
pub fn issue_session_token(identity: &Identity, secret: &[u8]) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = SessionClaims {
        sub: identity.id.clone(),
        role: identity.role,
        exp: (now + Duration::seconds(SESSION_TOKEN_TTL_SECS)).timestamp(),
        iat: now.timestamp(),
    };
    sign(&claims, secret)
}

/// Verify a session token.
pub fn verify_session_token(token: &str, secret: &[u8]) -> Option<SessionClaims> {
    verify(token, secret)
}

/// Mint a capability token scoped to one exact `(report_id, file)` pair
/// (15 min expiry). The token is the only access control on the download
/// path; no session is involved.
pub fn issue_capability_token(
    report_id: u64,
    file: &str,
    secret: &[u8],
) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = CapabilityClaims {
        report_id,
        file: file.to_string(),
        exp: (now + Duration::seconds(CAPABILITY_TOKEN_TTL_SECS)).timestamp(),
        iat: now.timestamp(),
    };
    sign(&claims, secret)
}

/// Verify a capability token. Scope comparison against the requested path
/// is the caller's job; this only proves the token is ours and unexpired.
pub fn verify_capability_token(token: &str, secret: &[u8]) -> Option<CapabilityClaims> {
    verify(token, secret)
}

/// Resolve the signing secret: env var `BUGBAY_SECRET` → `AUTH_SECRET` →
/// persisted file (generated on first run).
pub fn resolve_auth_secret() -> String {
    if let Ok(secret) = std::env::var("BUGBAY_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    if let Ok(secret) = std::env::var("AUTH_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    // Generate and persist
    let secret_path = auth_secret_path();
    if let Ok(existing) = std::fs::read_to_string(&secret_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = secret_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = std::fs::write(&secret_path, &secret);
    info!(path = %secret_path.display(), "generated new auth secret");
    secret
}

/// Path to the persisted auth secret file.
fn auth_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bugbay")
        .join("auth-secret")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;

    const SECRET: &[u8] = b"test-secret";

    fn identity() -> Identity {
        Identity {
            id: "u1".into(),
            role: Role::Developer,
        }
    }

    #[test]
    fn session_token_roundtrip() {
        let token = issue_session_token(&identity(), SECRET).expect("sign");
        let claims = verify_session_token(&token, SECRET).expect("verify");
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.role, Role::Developer);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_session_token(&identity(), SECRET).expect("sign");
        assert!(verify_session_token(&token, b"other-secret").is_none());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verify_session_token("not-a-token", SECRET).is_none());
    }

    #[test]
    fn expired_session_token_is_rejected() {
        let now = Utc::now();
        // Well past the default 60 s validation leeway.
        let claims = SessionClaims {
            sub: "u1".into(),
            role: Role::Admin,
            exp: (now - Duration::seconds(300)).timestamp(),
            iat: (now - Duration::seconds(3900)).timestamp(),
        };
        let token = sign(&claims, SECRET).expect("sign");
        assert!(verify_session_token(&token, SECRET).is_none());
    }

    #[test]
    fn capability_token_roundtrip() {
        let token = issue_capability_token(5, "abc.png", SECRET).expect("sign");
        let claims = verify_capability_token(&token, SECRET).expect("verify");
        assert_eq!(claims.report_id, 5);
        assert_eq!(claims.file, "abc.png");
    }

    #[test]
    fn expired_capability_token_is_rejected() {
        let now = Utc::now();
        let claims = CapabilityClaims {
            report_id: 5,
            file: "abc.png".into(),
            exp: (now - Duration::seconds(300)).timestamp(),
            iat: (now - Duration::seconds(1200)).timestamp(),
        };
        let token = sign(&claims, SECRET).expect("sign");
        assert!(verify_capability_token(&token, SECRET).is_none());
    }

    #[test]
    fn session_token_does_not_verify_as_capability() {
        let token = issue_session_token(&identity(), SECRET).expect("sign");
        assert!(verify_capability_token(&token, SECRET).is_none());
    }
}
