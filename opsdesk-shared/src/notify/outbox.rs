/// Push outbox model and queue operations
///
/// Outbox rows are written by the dispatcher inside the workflow
/// transaction and drained by the worker after commit. The queue is
/// at-least-once: a claim bumps `attempts` but leaves the row `pending`, so
/// a worker that dies mid-delivery loses nothing, at the cost of a possible
/// duplicate push.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE push_state AS ENUM ('pending', 'sent', 'failed');
///
/// CREATE TABLE push_outbox (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     chat_id VARCHAR(100) NOT NULL,
///     body TEXT NOT NULL,
///     state push_state NOT NULL DEFAULT 'pending',
///     attempts INTEGER NOT NULL DEFAULT 0,
///     last_error TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Delivery state of an outbox row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "push_state", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PushState {
    /// Awaiting delivery (or awaiting retry after a failed attempt)
    Pending,

    /// Delivered to the external channel
    Sent,

    /// Gave up after exhausting attempts
    Failed,
}

impl PushState {
    /// Converts state to string for display and logging
    pub fn as_str(&self) -> &'static str {
        match self {
            PushState::Pending => "pending",
            PushState::Sent => "sent",
            PushState::Failed => "failed",
        }
    }
}

/// A queued external push message
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PushOutbox {
    /// Unique row ID
    pub id: Uuid,

    /// Recipient user
    pub user_id: Uuid,

    /// External chat the message goes to
    pub chat_id: String,

    /// Message text
    pub body: String,

    /// Delivery state
    pub state: PushState,

    /// Delivery attempts so far
    pub attempts: i32,

    /// Error from the most recent failed attempt
    pub last_error: Option<String>,

    /// When the row was queued
    pub created_at: DateTime<Utc>,

    /// When the row last changed
    pub updated_at: DateTime<Utc>,
}

impl PushOutbox {
    /// Enqueues a push message
    ///
    /// Takes a connection so the row commits or rolls back with the
    /// workflow change that caused it.
    pub async fn enqueue(
        conn: &mut PgConnection,
        user_id: Uuid,
        chat_id: &str,
        body: &str,
    ) -> Result<Self, sqlx::Error> {
        let row = sqlx::query_as::<_, PushOutbox>(
            r#"
            INSERT INTO push_outbox (user_id, chat_id, body)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, chat_id, body, state, attempts, last_error,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(chat_id)
        .bind(body)
        .fetch_one(conn)
        .await?;

        Ok(row)
    }

    /// Claims a batch of pending rows for delivery
    ///
    /// `FOR UPDATE SKIP LOCKED` lets multiple workers drain the queue
    /// without contending for the same rows. The claim bumps `attempts` but
    /// keeps the row pending; only [`mark_sent`](Self::mark_sent) or
    /// [`mark_failed`](Self::mark_failed) settles it.
    pub async fn claim_batch(
        pool: &PgPool,
        batch_size: i64,
        max_attempts: i32,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, PushOutbox>(
            r#"
            UPDATE push_outbox
            SET attempts = attempts + 1, updated_at = NOW()
            WHERE id IN (
                SELECT id FROM push_outbox
                WHERE state = 'pending' AND attempts < $2
                ORDER BY created_at ASC
                LIMIT $1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING id, user_id, chat_id, body, state, attempts, last_error,
                      created_at, updated_at
            "#,
        )
        .bind(batch_size)
        .bind(max_attempts)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Marks a row delivered
    pub async fn mark_sent(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE push_outbox
            SET state = 'sent', last_error = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Records a failed attempt
    ///
    /// The row stays pending for retry until it has used `max_attempts`
    /// attempts, then it is parked as failed.
    pub async fn mark_failed(
        pool: &PgPool,
        id: Uuid,
        error: &str,
        max_attempts: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE push_outbox
            SET state = CASE WHEN attempts >= $3 THEN 'failed'::push_state
                             ELSE 'pending'::push_state END,
                last_error = $2,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(error)
        .bind(max_attempts)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Counts rows still awaiting delivery
    pub async fn count_pending(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM push_outbox WHERE state = 'pending'")
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_as_str() {
        assert_eq!(PushState::Pending.as_str(), "pending");
        assert_eq!(PushState::Sent.as_str(), "sent");
        assert_eq!(PushState::Failed.as_str(), "failed");
    }

    // Queue claiming and settlement require a live database
}
