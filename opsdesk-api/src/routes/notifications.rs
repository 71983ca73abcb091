/// Notification endpoints
///
/// # Endpoints
///
/// - `GET /v1/notifications/unread` - Caller's unread notifications
/// - `POST /v1/notifications/:id/read` - Mark one read (owner only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use opsdesk_shared::{
    auth::context::AuthContext,
    models::notification::{MarkReadOutcome, Notification},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unread listing query parameters
#[derive(Debug, Deserialize)]
pub struct UnreadQuery {
    /// Maximum rows to return (default 50, capped at 200)
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// Unread notifications response
#[derive(Debug, Serialize)]
pub struct UnreadResponse {
    /// Unread notifications, newest first
    pub notifications: Vec<Notification>,

    /// Number of notifications in this page
    pub count: usize,
}

/// Mark-read response
#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    /// Notification ID
    pub id: Uuid,

    /// Always true on success; repeat calls by the owner also succeed
    pub read: bool,
}

/// Unread notifications handler
///
/// Always scoped to the authenticated caller; there is no way to list
/// another user's notifications.
pub async fn list_unread(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<UnreadQuery>,
) -> ApiResult<Json<UnreadResponse>> {
    let limit = query.limit.clamp(1, 200);

    let notifications = Notification::list_unread(&state.db, ctx.user.id, limit).await?;
    let count = notifications.len();

    Ok(Json(UnreadResponse {
        notifications,
        count,
    }))
}

/// Mark-read handler
///
/// Owner-only and idempotent. A non-owner gets 403 without mutating
/// anything.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not the recipient
/// - `404 Not Found`: No such notification
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MarkReadResponse>> {
    match Notification::mark_read(&state.db, id, ctx.user.id).await? {
        MarkReadOutcome::Marked => Ok(Json(MarkReadResponse { id, read: true })),
        MarkReadOutcome::NotOwner => Err(ApiError::Forbidden(
            "Notification belongs to another user".to_string(),
        )),
        MarkReadOutcome::NotFound => {
            Err(ApiError::NotFound("Notification not found".to_string()))
        }
    }
}
