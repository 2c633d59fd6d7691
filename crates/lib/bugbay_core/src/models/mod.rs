//! Domain models.
//!
//! These are internal domain models, distinct from the API wire models in
//! `bugbay_api` (which carry `#[serde(rename_all = "camelCase")]` etc.).

pub mod auth;
pub mod report;
