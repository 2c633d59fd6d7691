//! Authentication logic.
//!
//! Provides password hashing, the token codec shared by session and
//! capability tokens, and the in-process user directory.

pub mod password;
pub mod token;
pub mod users;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    CredentialError,

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
