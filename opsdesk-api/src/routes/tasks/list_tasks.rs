/// List tasks endpoint
///
/// `GET /v1/tasks` returns tasks visible to the caller, newest first.
/// Elevated callers see everything; others see exactly the tasks they hold
/// an assignment on, and the narrowing happens in the query itself rather
/// than by filtering a broader result.

use crate::{app::AppState, error::ApiResult, routes::tasks::{TaskView, TASKS_MODULE}};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use opsdesk_shared::{access::require_module_access, auth::context::AuthContext, models::task::Task};
use serde::{Deserialize, Serialize};

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    /// Maximum rows to return (default 50, capped at 200)
    #[serde(default = "default_limit")]
    pub limit: i64,

    /// Rows to skip
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// List tasks response
#[derive(Debug, Serialize)]
pub struct ListTasksResponse {
    /// Tasks visible to the caller
    pub tasks: Vec<TaskView>,

    /// Number of tasks in this page
    pub count: usize,
}

/// List tasks handler
///
/// # Errors
///
/// - `403 Forbidden`: No grant for the tasks module
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<ListTasksResponse>> {
    require_module_access(&state.db, &ctx.user, TASKS_MODULE).await?;

    let limit = query.limit.clamp(1, 200);
    let offset = query.offset.max(0);

    let tasks = if ctx.user.role.is_elevated() {
        Task::list_all(&state.db, limit, offset).await?
    } else {
        Task::list_assigned_to(&state.db, ctx.user.id, limit, offset).await?
    };

    let tasks: Vec<TaskView> = tasks.into_iter().map(TaskView::now).collect();
    let count = tasks.len();

    Ok(Json(ListTasksResponse { tasks, count }))
}
