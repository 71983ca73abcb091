/// Database models for OpsDesk
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts, roles, and privilege tiers
/// - `module_grant`: Per-user access to named functional areas
/// - `task`: Tasks and their lifecycle status
/// - `assignment`: Task-to-user assignments
/// - `comment`: Append-only task comments
/// - `notification`: Per-recipient in-app notifications

pub mod assignment;
pub mod comment;
pub mod module_grant;
pub mod notification;
pub mod task;
pub mod user;
