/// Create task endpoint
///
/// `POST /v1/tasks` creates a task in pending state and assigns it in the
/// same transaction, so a task is never visible without its assignments.
/// Each assignee gets an in-app notification (and a queued push if they
/// have a chat linked) from that same transaction.
///
/// # Example Request
///
/// ```json
/// {
///   "title": "Replace server room air filter",
///   "description": "Filter is past its service interval",
///   "priority": "high",
///   "due_date": "2025-09-15T09:00:00Z",
///   "assignee_ids": ["550e8400-e29b-41d4-a716-446655440000"]
/// }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::tasks::TaskView,
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, Utc};
use opsdesk_shared::{
    access::require_elevated,
    auth::context::AuthContext,
    models::{
        assignment::Assignment,
        notification::NotificationKind,
        task::{CreateTask, Task, TaskPriority},
    },
    notify::{dispatch, NotificationEvent},
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 300, message = "Title must be 1-300 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Priority (default: medium)
    #[serde(default = "default_priority")]
    pub priority: TaskPriority,

    /// Planned start
    pub start_date: Option<DateTime<Utc>>,

    /// Deadline
    pub due_date: Option<DateTime<Utc>>,

    /// Users to assign; may be empty
    #[serde(default)]
    pub assignee_ids: Vec<Uuid>,
}

fn default_priority() -> TaskPriority {
    TaskPriority::Medium
}

/// Create task handler
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not elevated
/// - `409 Conflict`: An assignee ID is duplicated
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_task(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskView>)> {
    require_elevated(&ctx.user)?;

    req.validate().map_err(ApiError::from_validation_errors)?;

    if let (Some(start), Some(due)) = (req.start_date, req.due_date) {
        if due < start {
            return Err(ApiError::validation(
                "due_date",
                "Due date must not be before start date",
            ));
        }
    }

    let mut tx = state.db.begin().await?;

    let task = Task::create(
        &mut tx,
        CreateTask {
            title: req.title,
            description: req.description,
            priority: req.priority,
            start_date: req.start_date,
            due_date: req.due_date,
            created_by: ctx.user.id,
        },
    )
    .await?;

    for &assignee in &req.assignee_ids {
        Assignment::create(&mut tx, task.id, assignee, ctx.user.id).await?;
    }

    if !req.assignee_ids.is_empty() {
        dispatch(
            &mut tx,
            &NotificationEvent {
                recipients: req.assignee_ids.clone(),
                title: "New task assigned".to_string(),
                message: format!("You have been assigned: {}", task.title),
                kind: NotificationKind::Task,
                link: Some(format!("/tasks/{}", task.id)),
            },
        )
        .await?;
    }

    tx.commit().await?;

    info!(
        task_id = %task.id,
        assignees = req.assignee_ids.len(),
        created_by = %ctx.user.id,
        "task created"
    );

    Ok((StatusCode::CREATED, Json(TaskView::now(task))))
}
