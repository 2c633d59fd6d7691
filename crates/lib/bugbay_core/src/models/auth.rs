//! Authentication domain models.

use serde::{Deserialize, Serialize};

/// User role. Roles gate operations; `Admin` additionally holds the
/// severity-escalation capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Developer,
}

impl Role {
    /// Stable lowercase name, matching the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Developer => "developer",
        }
    }
}

/// Resolved caller identity. Produced at login, embedded in the session
/// token, never stored server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub role: Role,
}

/// Claims embedded in session tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject — user ID (standard JWT `sub` claim).
    pub sub: String,
    /// User role.
    pub role: Role,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}

impl SessionClaims {
    /// The identity this token proves.
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.sub.clone(),
            role: self.role,
        }
    }
}

/// Claims embedded in capability tokens. Grants anonymous access to one
/// exact `(report_id, file)` pair, independent of any session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityClaims {
    /// Report the file belongs to.
    pub report_id: u64,
    /// Opaque stored filename.
    pub file: String,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}

/// A user known to the in-process directory.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}
