//! # OpsDesk Shared Library
//!
//! This crate contains shared types, utilities, and business logic used across
//! the OpsDesk API server and push-delivery worker.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `db`: Connection pool and migrations
//! - `auth`: Password hashing, JWT tokens, request identity
//! - `access`: Module-grant and task-visibility checks
//! - `workflow`: Task status transition rules
//! - `notify`: Notification dispatch and push outbox

pub mod access;
pub mod auth;
pub mod db;
pub mod models;
pub mod notify;
pub mod workflow;

/// Current version of the OpsDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
