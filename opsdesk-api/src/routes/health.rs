/// Health check endpoint
///
/// `GET /health` reports process liveness and database reachability.
/// Returns 200 with status "ok" when the database answers, 503 otherwise.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status ("ok" or "degraded")
    pub status: String,

    /// Server version
    pub version: String,

    /// Database reachability
    pub database: bool,
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let database = opsdesk_shared::db::pool::health_check(&state.db).await.is_ok();

    let status = if database { "ok" } else { "degraded" };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    }))
}
