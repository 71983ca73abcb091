/// List comments endpoint
///
/// `GET /v1/tasks/:id/comments` returns a task's comments, newest first.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::tasks::TASKS_MODULE,
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use opsdesk_shared::{
    access::{require_module_access, require_task_visibility},
    auth::context::AuthContext,
    models::{comment::Comment, task::Task},
};
use serde::Serialize;
use uuid::Uuid;

/// List comments response
#[derive(Debug, Serialize)]
pub struct ListCommentsResponse {
    /// Comments, newest first
    pub comments: Vec<Comment>,
}

/// List comments handler
///
/// # Errors
///
/// - `403 Forbidden`: Task is not visible to the caller
/// - `404 Not Found`: Task does not exist (elevated callers only)
pub async fn list_comments(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ListCommentsResponse>> {
    require_module_access(&state.db, &ctx.user, TASKS_MODULE).await?;
    require_task_visibility(&state.db, &ctx.user, id).await?;

    // Only elevated callers reach this point for a missing task.
    Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let comments = Comment::list_by_task(&state.db, id).await?;

    Ok(Json(ListCommentsResponse { comments }))
}
