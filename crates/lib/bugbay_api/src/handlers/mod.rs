//! Request handlers.

pub mod attachments;
pub mod audit;
pub mod auth;
pub mod entries;
pub mod reports;
