//! In-process user directory.
//!
//! The service keeps no user table: the directory is seeded once at
//! startup from environment-provided passwords and held read-only for the
//! process lifetime. Authentication state lives entirely in tokens.

use tracing::warn;

use super::{AuthError, password};
use crate::models::auth::{Identity, Role, UserRecord};

/// Read-only set of users known to this process.
#[derive(Debug)]
pub struct UserDirectory {
    users: Vec<UserRecord>,
}

impl UserDirectory {
    /// Build a directory from pre-hashed records (used by tests).
    pub fn with_users(users: Vec<UserRecord>) -> Self {
        Self { users }
    }

    /// Seed the default `admin` and `developer` accounts, hashing the
    /// passwords from `ADMIN_PASSWORD` / `DEVELOPER_PASSWORD` env vars.
    /// Falls back to development defaults when unset.
    pub fn seeded_from_env() -> Result<Self, AuthError> {
        let admin_password = env_or_default("ADMIN_PASSWORD", "admin-dev-password");
        let developer_password = env_or_default("DEVELOPER_PASSWORD", "developer-dev-password");
        let users = vec![
            UserRecord {
                id: "admin".into(),
                username: "admin".into(),
                password_hash: password::hash_password(&admin_password)?,
                role: Role::Admin,
            },
            UserRecord {
                id: "developer".into(),
                username: "developer".into(),
                password_hash: password::hash_password(&developer_password)?,
                role: Role::Developer,
            },
        ];
        Ok(Self { users })
    }

    /// Authenticate a username/password pair. Unknown user and wrong
    /// password collapse to the same `CredentialError`.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        let Some(user) = self.users.iter().find(|u| u.username == username) else {
            // Burn a comparable amount of time to keep timing uniform.
            let _ = password::verify_password(password, DUMMY_HASH);
            return Err(AuthError::CredentialError);
        };
        if !password::verify_password(password, &user.password_hash)? {
            warn!(username, "failed login attempt");
            return Err(AuthError::CredentialError);
        }
        Ok(Identity {
            id: user.id.clone(),
            role: user.role,
        })
    }

    /// Look up a user by username.
    pub fn find(&self, username: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.username == username)
    }
}

/// bcrypt hash of an unguessable throwaway string, verified against when
/// the username is unknown.
const DUMMY_HASH: &str = "$2b$10$CwTycUXWue0Thq9StjUM0uJ8Zi5TbaAxBhtaPQLKVnLGhBGtBaeK6";

fn env_or_default(var: &str, default: &str) -> String {
    match std::env::var(var) {
        Ok(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> UserDirectory {
        UserDirectory::with_users(vec![UserRecord {
            id: "admin".into(),
            username: "admin".into(),
            password_hash: password::hash_password("hunter2").expect("hash"),
            role: Role::Admin,
        }])
    }

    #[test]
    fn authenticate_accepts_correct_password() {
        let identity = directory().authenticate("admin", "hunter2").expect("auth");
        assert_eq!(identity.id, "admin");
        assert_eq!(identity.role, Role::Admin);
    }

    #[test]
    fn wrong_password_and_unknown_user_are_indistinguishable() {
        let dir = directory();
        let a = dir.authenticate("admin", "wrong").unwrap_err();
        let b = dir.authenticate("nobody", "hunter2").unwrap_err();
        assert_eq!(a.to_string(), b.to_string());
    }
}
