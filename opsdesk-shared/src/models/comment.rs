/// Comment model and database operations
///
/// Comments are append-only: once created they can never be edited or
/// deleted individually. They disappear only when their task is deleted
/// (schema-level cascade).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id),
///     body TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A single task comment
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    /// Unique comment ID
    pub id: Uuid,

    /// Task the comment belongs to
    pub task_id: Uuid,

    /// Author
    pub user_id: Uuid,

    /// Comment text
    pub body: String,

    /// When the comment was written
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Appends a comment to a task
    ///
    /// There is intentionally no update or single-row delete operation on
    /// this model.
    pub async fn create(
        pool: &PgPool,
        task_id: Uuid,
        user_id: Uuid,
        body: String,
    ) -> Result<Self, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (task_id, user_id, body)
            VALUES ($1, $2, $3)
            RETURNING id, task_id, user_id, body, created_at
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .bind(body)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    /// Lists comments on a task, newest first
    pub async fn list_by_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, task_id, user_id, body, created_at
            FROM comments
            WHERE task_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }
}
