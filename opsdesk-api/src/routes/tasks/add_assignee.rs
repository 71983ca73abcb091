/// Assignment endpoints
///
/// `POST /v1/tasks/:id/assignees` assigns a user; the new assignee is
/// notified in the same transaction. `DELETE /v1/tasks/:id/assignees/:user_id`
/// removes one; the user loses visibility of the task immediately.
/// Both are elevated-only.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use opsdesk_shared::{
    access::require_elevated,
    auth::context::AuthContext,
    models::{
        assignment::Assignment, notification::NotificationKind, task::Task, user::User,
    },
    notify::{dispatch, NotificationEvent},
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

/// Add assignee request
#[derive(Debug, Deserialize)]
pub struct AddAssigneeRequest {
    /// User to assign
    pub user_id: Uuid,
}

/// Add assignee handler
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not elevated
/// - `404 Not Found`: Task or user does not exist
/// - `409 Conflict`: User is already assigned
/// - `422 Unprocessable Entity`: Target account is inactive
pub async fn add_assignee(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddAssigneeRequest>,
) -> ApiResult<(StatusCode, Json<Assignment>)> {
    require_elevated(&ctx.user)?;

    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let target = User::find_by_id(&state.db, req.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if !target.is_active {
        return Err(ApiError::validation(
            "user_id",
            "Cannot assign an inactive account",
        ));
    }

    let mut tx = state.db.begin().await?;

    let assignment = Assignment::create(&mut tx, id, target.id, ctx.user.id).await?;

    dispatch(
        &mut tx,
        &NotificationEvent {
            recipients: vec![target.id],
            title: "New task assigned".to_string(),
            message: format!("You have been assigned: {}", task.title),
            kind: NotificationKind::Task,
            link: Some(format!("/tasks/{}", task.id)),
        },
    )
    .await?;

    tx.commit().await?;

    info!(task_id = %id, user_id = %target.id, actor = %ctx.user.id, "assignee added");

    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Remove assignee handler
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not elevated
/// - `404 Not Found`: No such assignment
pub async fn remove_assignee(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    require_elevated(&ctx.user)?;

    let removed = Assignment::remove(&state.db, id, user_id).await?;
    if !removed {
        return Err(ApiError::NotFound("Assignment not found".to_string()));
    }

    info!(task_id = %id, user_id = %user_id, actor = %ctx.user.id, "assignee removed");

    Ok(StatusCode::NO_CONTENT)
}
