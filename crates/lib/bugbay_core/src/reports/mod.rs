//! Report domain: repository, authorization rules, audit diffing, and
//! entry pagination.

pub mod audit;
pub mod pagination;
pub mod repository;
pub mod rules;

use thiserror::Error;

/// Report domain errors.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}
