/// Assignment model and database operations
///
/// Assignments are the many-to-many relation between tasks and users. An
/// assignment is what makes a task visible to a non-elevated user, lets them
/// self-report completion, and makes them a recipient of completion
/// notifications.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE assignments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     assigned_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     assigned_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (task_id, user_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Assignment of a task to a user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Assignment {
    /// Unique assignment ID
    pub id: Uuid,

    /// Task being assigned
    pub task_id: Uuid,

    /// User the task is assigned to
    pub user_id: Uuid,

    /// Elevated actor who made the assignment
    pub assigned_by: Option<Uuid>,

    /// When the assignment was made
    pub assigned_at: DateTime<Utc>,
}

impl Assignment {
    /// Creates an assignment
    ///
    /// Takes a connection so it can share the task-creation transaction.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate (task, user) pairs or when either
    /// foreign key is missing.
    pub async fn create(
        conn: &mut PgConnection,
        task_id: Uuid,
        user_id: Uuid,
        assigned_by: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO assignments (task_id, user_id, assigned_by)
            VALUES ($1, $2, $3)
            RETURNING id, task_id, user_id, assigned_by, assigned_at
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .bind(assigned_by)
        .fetch_one(conn)
        .await?;

        Ok(assignment)
    }

    /// Checks whether a user is assigned to a task
    pub async fn exists(pool: &PgPool, task_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM assignments
                WHERE task_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Lists the distinct user IDs assigned to a task
    pub async fn assignee_ids(pool: &PgPool, task_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT user_id FROM assignments
            WHERE task_id = $1
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(ids)
    }

    /// Lists assignments for a task
    pub async fn list_by_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let assignments = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT id, task_id, user_id, assigned_by, assigned_at
            FROM assignments
            WHERE task_id = $1
            ORDER BY assigned_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(assignments)
    }

    /// Removes a user from a task
    ///
    /// Returns true if an assignment row was deleted. After removal the user
    /// loses visibility of the task on every access path.
    pub async fn remove(pool: &PgPool, task_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assignments WHERE task_id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    // Assignment behavior is exercised through the access-control and
    // workflow tests; database operations require a live database.
}
