/// Task model and database operations
///
/// Tasks are the core entity of the approval workflow. Status is the
/// authoritative lifecycle field; "overdue" is never stored, it is derived
/// from `due_date` at read time via [`Task::is_overdue`].
///
/// # State Machine
///
/// ```text
/// pending → in_progress → review → completed
///                       ↘ completed (elevated approval)
/// any → any                        (elevated override, within known states)
/// ```
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in_progress', 'review', 'completed');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high', 'urgent');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(300) NOT NULL,
///     description TEXT,
///     priority task_priority NOT NULL DEFAULT 'medium',
///     status task_status NOT NULL DEFAULT 'pending',
///     start_date TIMESTAMPTZ,
///     due_date TIMESTAMPTZ,
///     completion_date TIMESTAMPTZ,
///     created_by UUID NOT NULL REFERENCES users(id),
///     version BIGINT NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Concurrent status updates are serialized by the `version` column: every
/// write is a compare-and-set against the version the writer read, so a lost
/// race is reported to the caller instead of silently overwritten.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Task lifecycle status
///
/// `overdue` is deliberately not a variant; it is a display attribute
/// computed as `due_date < now AND status != completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created, work not started
    Pending,

    /// An assignee has picked the task up
    InProgress,

    /// Self-reported complete by an assignee, awaiting approval
    Review,

    /// Approved complete by an elevated actor
    Completed,
}

impl TaskStatus {
    /// Converts status to string for display and logging
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Review => "review",
            TaskStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// Converts priority to string for display and logging
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Short title
    pub title: String,

    /// Free-form description
    pub description: Option<String>,

    /// Priority for display ordering
    pub priority: TaskPriority,

    /// Authoritative lifecycle status
    pub status: TaskStatus,

    /// When work is planned to start
    pub start_date: Option<DateTime<Utc>>,

    /// Deadline; drives the derived overdue flag
    pub due_date: Option<DateTime<Utc>>,

    /// Set exactly once, when an elevated actor approves completion
    pub completion_date: Option<DateTime<Utc>>,

    /// Creator (always present; tasks are owned by their creator)
    pub created_by: Uuid,

    /// Optimistic concurrency counter, bumped on every status write
    pub version: i64,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,

    #[serde(default = "default_priority")]
    pub priority: TaskPriority,

    pub start_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,

    /// Creator user ID
    pub created_by: Uuid,
}

fn default_priority() -> TaskPriority {
    TaskPriority::Medium
}

impl Task {
    /// Whether the task is past its deadline and not yet completed
    ///
    /// This is the only definition of "overdue" in the system.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => due < now && self.status != TaskStatus::Completed,
            None => false,
        }
    }

    /// Creates a new task in pending state
    ///
    /// Takes a connection rather than a pool so task creation can share a
    /// transaction with assignment and notification rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create(conn: &mut PgConnection, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, priority, start_date, due_date, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, description, priority, status, start_date, due_date,
                      completion_date, created_by, version, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.priority)
        .bind(data.start_date)
        .bind(data.due_date)
        .bind(data.created_by)
        .fetch_one(conn)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, priority, status, start_date, due_date,
                   completion_date, created_by, version, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists every task, newest first (elevated actors only)
    pub async fn list_all(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, priority, status, start_date, due_date,
                   completion_date, created_by, version, created_at, updated_at
            FROM tasks
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks assigned to a user, newest first
    ///
    /// Visibility is enforced by the join itself: rows for tasks the user
    /// holds no assignment on are never fetched, so there is nothing to
    /// post-filter.
    pub async fn list_assigned_to(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT t.id, t.title, t.description, t.priority, t.status, t.start_date,
                   t.due_date, t.completion_date, t.created_by, t.version,
                   t.created_at, t.updated_at
            FROM tasks t
            INNER JOIN assignments a ON a.task_id = t.id
            WHERE a.user_id = $1
            ORDER BY t.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Writes a new status with compare-and-set on the version counter
    ///
    /// Returns the updated task, or None when the version no longer matches
    /// (a concurrent writer won the race) or the task is gone. The caller
    /// decides whether None means conflict or not-found.
    ///
    /// `completion_date` is only written when `record_completion` is true;
    /// it is never cleared here.
    pub async fn update_status(
        conn: &mut PgConnection,
        id: Uuid,
        expected_version: i64,
        new_status: TaskStatus,
        record_completion: bool,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = $3,
                completion_date = CASE WHEN $4 THEN NOW() ELSE completion_date END,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND version = $2
            RETURNING id, title, description, priority, status, start_date, due_date,
                      completion_date, created_by, version, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(expected_version)
        .bind(new_status)
        .bind(record_completion)
        .fetch_optional(conn)
        .await?;

        Ok(task)
    }

    /// Deletes a task
    ///
    /// Assignments and comments cascade at the schema level, so the whole
    /// subtree goes in one statement.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts tasks by status
    pub async fn count_by_status(pool: &PgPool, status: TaskStatus) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE status = $1")
            .bind(status)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Counts tasks past their deadline and not completed
    pub async fn count_overdue(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM tasks
            WHERE due_date < NOW() AND status != 'completed'
            "#,
        )
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_task(status: TaskStatus, due_date: Option<DateTime<Utc>>) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "Inspect backup generator".to_string(),
            description: None,
            priority: TaskPriority::Medium,
            status,
            start_date: None,
            due_date,
            completion_date: None,
            created_by: Uuid::new_v4(),
            version: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_as_str() {
        assert_eq!(TaskStatus::Pending.as_str(), "pending");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::Review.as_str(), "review");
        assert_eq!(TaskStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn test_priority_as_str() {
        assert_eq!(TaskPriority::Low.as_str(), "low");
        assert_eq!(TaskPriority::Urgent.as_str(), "urgent");
    }

    #[test]
    fn test_status_serde_rejects_unknown() {
        // The elevated override is only valid within the known status set;
        // arbitrary strings must fail to parse.
        assert!(serde_json::from_str::<TaskStatus>("\"archived\"").is_err());
        assert!(serde_json::from_str::<TaskStatus>("\"overdue\"").is_err());
        assert_eq!(
            serde_json::from_str::<TaskStatus>("\"in_progress\"").unwrap(),
            TaskStatus::InProgress
        );
    }

    #[test]
    fn test_overdue_requires_past_due_date() {
        let now = Utc::now();
        let task = sample_task(TaskStatus::InProgress, Some(now - Duration::days(1)));
        assert!(task.is_overdue(now));

        let task = sample_task(TaskStatus::InProgress, Some(now + Duration::days(1)));
        assert!(!task.is_overdue(now));

        let task = sample_task(TaskStatus::InProgress, None);
        assert!(!task.is_overdue(now));
    }

    #[test]
    fn test_completed_is_never_overdue() {
        let now = Utc::now();
        let task = sample_task(TaskStatus::Completed, Some(now - Duration::days(7)));
        assert!(!task.is_overdue(now));
    }

    #[test]
    fn test_default_priority() {
        assert_eq!(default_priority(), TaskPriority::Medium);
    }

    // Integration tests for database operations require a live database
}
