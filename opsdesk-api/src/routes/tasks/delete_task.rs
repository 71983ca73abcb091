/// Delete task endpoint
///
/// `DELETE /v1/tasks/:id` removes a task and, by schema cascade, its
/// assignments and comments. Elevated only.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension,
};
use opsdesk_shared::{access::require_elevated, auth::context::AuthContext, models::task::Task};
use tracing::info;
use uuid::Uuid;

/// Delete task handler
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not elevated
/// - `404 Not Found`: Task does not exist
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require_elevated(&ctx.user)?;

    let deleted = Task::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    info!(task_id = %id, actor = %ctx.user.id, "task deleted");

    Ok(StatusCode::NO_CONTENT)
}
