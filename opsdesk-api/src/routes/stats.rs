/// Dashboard statistics endpoint
///
/// `GET /v1/stats` returns task counters for the console dashboard.
/// Elevated-only; the counters span every task, not just visible ones.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use opsdesk_shared::{
    access::require_elevated,
    auth::context::AuthContext,
    models::task::{Task, TaskStatus},
    notify::PushOutbox,
};
use serde::Serialize;

/// Dashboard statistics response
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Tasks awaiting work
    pub pending: i64,

    /// Tasks being worked
    pub in_progress: i64,

    /// Tasks awaiting approval
    pub review: i64,

    /// Approved tasks
    pub completed: i64,

    /// Tasks past deadline and not completed (derived, never stored)
    pub overdue: i64,

    /// Push messages still awaiting delivery
    pub push_backlog: i64,
}

/// Statistics handler
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not elevated
pub async fn get_stats(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<StatsResponse>> {
    require_elevated(&ctx.user)?;

    let pending = Task::count_by_status(&state.db, TaskStatus::Pending).await?;
    let in_progress = Task::count_by_status(&state.db, TaskStatus::InProgress).await?;
    let review = Task::count_by_status(&state.db, TaskStatus::Review).await?;
    let completed = Task::count_by_status(&state.db, TaskStatus::Completed).await?;
    let overdue = Task::count_overdue(&state.db).await?;
    let push_backlog = PushOutbox::count_pending(&state.db).await?;

    Ok(Json(StatsResponse {
        pending,
        in_progress,
        review,
        completed,
        overdue,
        push_backlog,
    }))
}
