/// Transactional notification dispatch
///
/// [`dispatch`] fans one event out to its recipients inside the caller's
/// transaction: one in-app notification row per recipient, plus one push
/// outbox row per recipient who has an external chat linked. Recipients
/// without a chat simply get no outbox row; that is not an error.
///
/// Nothing here talks to the network. External delivery is the push
/// worker's job, after the transaction commits.

use sqlx::PgConnection;
use tracing::debug;
use uuid::Uuid;

use crate::models::notification::{Notification, NotificationKind};
use crate::notify::outbox::PushOutbox;

/// One notification fanned out to a set of recipients
#[derive(Debug, Clone)]
pub struct NotificationEvent {
    /// Recipient user IDs; duplicates are fine, each gets one row per entry
    pub recipients: Vec<Uuid>,

    /// Short title
    pub title: String,

    /// Message body, also used as the push text
    pub message: String,

    /// Category
    pub kind: NotificationKind,

    /// Optional in-app link target
    pub link: Option<String>,
}

/// Writes the event's notification and outbox rows
///
/// Must be called on the same transaction as the state change the event
/// describes, so the rows appear iff the change commits.
pub async fn dispatch(
    conn: &mut PgConnection,
    event: &NotificationEvent,
) -> Result<(), sqlx::Error> {
    for &recipient in &event.recipients {
        Notification::create(
            &mut *conn,
            recipient,
            &event.title,
            &event.message,
            event.kind,
            event.link.as_deref(),
        )
        .await?;

        // Only active recipients with a linked chat get a push row.
        let chat_id: Option<String> = sqlx::query_scalar(
            r#"
            SELECT telegram_chat_id FROM users
            WHERE id = $1 AND is_active = TRUE AND telegram_chat_id IS NOT NULL
            "#,
        )
        .bind(recipient)
        .fetch_optional(&mut *conn)
        .await?
        .flatten();

        if let Some(chat_id) = chat_id {
            let body = format!("{}\n{}", event.title, event.message);
            PushOutbox::enqueue(&mut *conn, recipient, &chat_id, &body).await?;
        }
    }

    debug!(
        recipients = event.recipients.len(),
        kind = event.kind.as_str(),
        "dispatched notification event"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_construction() {
        let event = NotificationEvent {
            recipients: vec![Uuid::new_v4(), Uuid::new_v4()],
            title: "Task submitted for review".to_string(),
            message: "Quarterly report is ready for approval".to_string(),
            kind: NotificationKind::Task,
            link: Some("/tasks/42".to_string()),
        };
        assert_eq!(event.recipients.len(), 2);
        assert_eq!(event.kind, NotificationKind::Task);
    }

    // Fan-out against the database is covered by integration tests
}
