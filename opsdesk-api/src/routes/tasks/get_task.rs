/// Task detail endpoint
///
/// `GET /v1/tasks/:id` returns one task with its assignee list. The
/// visibility guard runs before the row is even fetched, so a non-elevated
/// caller probing IDs gets the same 403 whether the task exists or not.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::tasks::{TaskView, TASKS_MODULE},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use opsdesk_shared::{
    access::{require_module_access, require_task_visibility},
    auth::context::AuthContext,
    models::{assignment::Assignment, task::Task},
};
use serde::Serialize;
use uuid::Uuid;

/// Task detail response
#[derive(Debug, Serialize)]
pub struct TaskDetailResponse {
    #[serde(flatten)]
    pub task: TaskView,

    /// Users currently assigned
    pub assignee_ids: Vec<Uuid>,
}

/// Task detail handler
///
/// # Errors
///
/// - `403 Forbidden`: Task is not visible to the caller
/// - `404 Not Found`: Task does not exist (elevated callers only)
pub async fn get_task(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskDetailResponse>> {
    require_module_access(&state.db, &ctx.user, TASKS_MODULE).await?;
    require_task_visibility(&state.db, &ctx.user, id).await?;

    // Only elevated callers reach this point for a missing task.
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let assignee_ids = Assignment::assignee_ids(&state.db, id).await?;

    Ok(Json(TaskDetailResponse {
        task: TaskView::now(task),
        assignee_ids,
    }))
}
