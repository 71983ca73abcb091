//! # OpsDesk Push Worker
//!
//! Drains the push outbox and delivers messages to the external channel.
//! Delivery is best effort and fully decoupled from the API: a dead
//! channel only grows the backlog, it never fails a workflow operation.

pub mod channels;
pub mod config;
pub mod deliverer;
