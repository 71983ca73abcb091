/// API route handlers

pub mod auth;
pub mod grants;
pub mod health;
pub mod notifications;
pub mod stats;
pub mod tasks;
