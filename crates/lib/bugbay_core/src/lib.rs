//! # bugbay_core
//!
//! Core domain logic for Bugbay: token signing, access control rules,
//! the report repository, audit diffing, and the byte-storage and
//! notification collaborators.

pub mod auth;
pub mod models;
pub mod notify;
pub mod reports;
pub mod storage;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
