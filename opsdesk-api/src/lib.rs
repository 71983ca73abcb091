//! # OpsDesk API Server
//!
//! HTTP surface of the operations console: task workflow, in-app
//! notifications, and module access administration, all behind JWT
//! authentication with per-request access checks.

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
