/// Workflow transition endpoint
///
/// `POST /v1/tasks/:id/status` is the heart of the approval workflow.
/// The decision itself is pure ([`opsdesk_shared::workflow::decide`]); this
/// handler loads the inputs, applies the decided transition with a
/// compare-and-set on the task's version counter, and writes the resulting
/// notifications in the same transaction.
///
/// A request that would leave the task where it already is succeeds without
/// writing anything, so retries and double-clicks cause no duplicate
/// notifications.
///
/// # Example Request
///
/// ```json
/// { "status": "completed" }
/// ```
///
/// The response may report a different status than requested: a staff
/// assignee asking for `completed` lands the task in `review`.

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
    models::{
        assignment::Assignment,
        notification::NotificationKind,
        task::{Task, TaskStatus},
    },
    notify::{dispatch, NotificationEvent},
    workflow::{decide, Notice},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Status update request
///
/// `status` parses into [`TaskStatus`]; an unknown status name is rejected
/// with 422 before any role logic runs, for every caller.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Requested target status
    pub status: TaskStatus,
}

/// Status update response
#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    #[serde(flatten)]
    pub task: TaskView,

    /// False when the request was a no-op
    pub changed: bool,
}

/// Status update handler
///
/// # Errors
///
/// - `403 Forbidden`: Task not visible, or caller is not an assignee
/// - `404 Not Found`: Task does not exist (elevated callers only)
/// - `409 Conflict`: A concurrent update won the race; retry with fresh state
/// - `422 Unprocessable Entity`: Unknown status or disallowed transition
pub async fn update_status(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<UpdateStatusResponse>> {
    require_module_access(&state.db, &ctx.user, TASKS_MODULE).await?;
    require_task_visibility(&state.db, &ctx.user, id).await?;

    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let is_assignee = Assignment::exists(&state.db, id, ctx.user.id).await?;

    let transition = decide(ctx.user.role, is_assignee, task.status, req.status)?;

    let Some(transition) = transition else {
        // Already where the request would put it; nothing to write.
        return Ok(Json(UpdateStatusResponse {
            task: TaskView::now(task),
            changed: false,
        }));
    };

    let mut tx = state.db.begin().await?;

    let updated = Task::update_status(
        &mut tx,
        id,
        task.version,
        transition.new_status,
        transition.record_completion,
    )
    .await?
    .ok_or_else(|| {
        ApiError::Conflict("Task was modified concurrently; reload and retry".to_string())
    })?;

    match transition.notice {
        Notice::NotifyCreator => {
            dispatch(
                &mut tx,
                &NotificationEvent {
                    recipients: vec![task.created_by],
                    title: "Task submitted for review".to_string(),
                    message: format!("{} reported '{}' as done", ctx.user.full_name, task.title),
                    kind: NotificationKind::Task,
                    link: Some(format!("/tasks/{}", task.id)),
                },
            )
            .await?;
        }
        Notice::NotifyAssignees => {
            let assignees = Assignment::assignee_ids(&state.db, id).await?;
            if !assignees.is_empty() {
                dispatch(
                    &mut tx,
                    &NotificationEvent {
                        recipients: assignees,
                        title: "Task completed".to_string(),
                        message: format!("'{}' was approved as completed", task.title),
                        kind: NotificationKind::Task,
                        link: Some(format!("/tasks/{}", task.id)),
                    },
                )
                .await?;
            }
        }
        Notice::None => {}
    }

    tx.commit().await?;

    info!(
        task_id = %id,
        from = task.status.as_str(),
        to = updated.status.as_str(),
        actor = %ctx.user.id,
        "task status updated"
    );

    Ok(Json(UpdateStatusResponse {
        task: TaskView::now(updated),
        changed: true,
    }))
}
