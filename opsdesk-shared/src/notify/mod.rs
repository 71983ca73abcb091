/// Notification dispatch
///
/// Splits delivery into two halves with different guarantees:
///
/// - [`dispatcher`] writes in-app notification rows and push outbox rows
///   inside the caller's transaction. This half is transactional: if the
///   workflow change commits, the notifications exist; if it rolls back,
///   they never happened.
/// - [`outbox`] is the durable queue the push worker drains. External
///   delivery is best effort and happens strictly after commit, so a dead
///   push channel can never block or fail a workflow operation.

pub mod dispatcher;
pub mod outbox;

pub use dispatcher::{dispatch, NotificationEvent};
pub use outbox::{PushOutbox, PushState};
