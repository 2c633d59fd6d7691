//! Service layer between handlers and `bugbay_core`.

pub mod auth;
pub mod downloads;
