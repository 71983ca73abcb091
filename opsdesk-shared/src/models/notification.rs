/// Notification model and database operations
///
/// A notification belongs to exactly one recipient and is only ever mutated
/// by that recipient, and only in one direction: the read flag goes
/// false → true once and never back.
///
/// Rows are created by the notification dispatcher inside the workflow
/// transaction (see [`crate::notify`]); nothing else writes this table.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE notification_kind AS ENUM ('task', 'reminder', 'alert');
///
/// CREATE TABLE notifications (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(200) NOT NULL,
///     message TEXT NOT NULL,
///     kind notification_kind NOT NULL DEFAULT 'task',
///     link VARCHAR(500),
///     is_read BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Task lifecycle events (assignment, review, approval)
    Task,

    /// Scheduled reminders
    Reminder,

    /// System alerts
    Alert,
}

impl NotificationKind {
    /// Converts kind to string for display and logging
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Task => "task",
            NotificationKind::Reminder => "reminder",
            NotificationKind::Alert => "alert",
        }
    }
}

/// In-app notification for a single recipient
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    /// Unique notification ID
    pub id: Uuid,

    /// Recipient; the only actor allowed to mark the row read
    pub user_id: Uuid,

    /// Short title
    pub title: String,

    /// Message body
    pub message: String,

    /// Category
    pub kind: NotificationKind,

    /// Optional in-app link target
    pub link: Option<String>,

    /// Read flag; transitions false → true only
    pub is_read: bool,

    /// When the notification was created
    pub created_at: DateTime<Utc>,
}

/// Outcome of a mark-read attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkReadOutcome {
    /// The flag was set, or was already set (idempotent for the owner)
    Marked,

    /// The actor is not the recipient; nothing changed
    NotOwner,

    /// No such notification
    NotFound,
}

impl Notification {
    /// Inserts a notification row
    ///
    /// Takes a connection so the insert participates in the caller's
    /// workflow transaction; this step must never be skipped or deferred.
    pub async fn create(
        conn: &mut PgConnection,
        user_id: Uuid,
        title: &str,
        message: &str,
        kind: NotificationKind,
        link: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, title, message, kind, link)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, message, kind, link, is_read, created_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(message)
        .bind(kind)
        .bind(link)
        .fetch_one(conn)
        .await?;

        Ok(notification)
    }

    /// Finds a notification by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, title, message, kind, link, is_read, created_at
            FROM notifications
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(notification)
    }

    /// Lists a user's unread notifications, newest first, bounded
    pub async fn list_unread(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, title, message, kind, link, is_read, created_at
            FROM notifications
            WHERE user_id = $1 AND is_read = FALSE
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(notifications)
    }

    /// Marks a notification read on behalf of `actor`
    ///
    /// Owner-only and idempotent: a second call by the owner succeeds with
    /// no further effect, any call by a non-owner is denied without
    /// mutation. The guarded UPDATE makes the ownership check and the write
    /// a single statement, so a non-owner can never flip the flag.
    pub async fn mark_read(
        pool: &PgPool,
        id: Uuid,
        actor: Uuid,
    ) -> Result<MarkReadOutcome, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(actor)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(MarkReadOutcome::Marked);
        }

        // Nothing matched: distinguish wrong owner from a missing row so the
        // caller can surface an explicit denial rather than a 404.
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM notifications WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;

        if exists {
            Ok(MarkReadOutcome::NotOwner)
        } else {
            Ok(MarkReadOutcome::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_as_str() {
        assert_eq!(NotificationKind::Task.as_str(), "task");
        assert_eq!(NotificationKind::Reminder.as_str(), "reminder");
        assert_eq!(NotificationKind::Alert.as_str(), "alert");
    }

    #[test]
    fn test_mark_read_outcome_eq() {
        assert_eq!(MarkReadOutcome::Marked, MarkReadOutcome::Marked);
        assert_ne!(MarkReadOutcome::Marked, MarkReadOutcome::NotOwner);
    }

    // Integration tests for database operations require a live database
}
