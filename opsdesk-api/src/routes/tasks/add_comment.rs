/// Add comment endpoint
///
/// `POST /v1/tasks/:id/comments` appends a comment. Comments are
/// append-only; there is no edit or delete.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::tasks::TASKS_MODULE,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use opsdesk_shared::{
    access::{require_module_access, require_task_visibility},
    auth::context::AuthContext,
    models::{comment::Comment, task::Task},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Add comment request
#[derive(Debug, Deserialize, Validate)]
pub struct AddCommentRequest {
    /// Comment text
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    pub body: String,
}

/// Add comment handler
///
/// # Errors
///
/// - `403 Forbidden`: Task is not visible to the caller
/// - `404 Not Found`: Task does not exist (elevated callers only)
/// - `422 Unprocessable Entity`: Empty or oversized comment
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddCommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    require_module_access(&state.db, &ctx.user, TASKS_MODULE).await?;
    require_task_visibility(&state.db, &ctx.user, id).await?;

    // Only elevated callers reach this point for a missing task.
    Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    req.validate().map_err(ApiError::from_validation_errors)?;

    let comment = Comment::create(&state.db, id, ctx.user.id, req.body).await?;

    Ok((StatusCode::CREATED, Json(comment)))
}
