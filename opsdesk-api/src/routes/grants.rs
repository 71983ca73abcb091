/// Module grant administration endpoints
///
/// Grants gate non-elevated users' access to named functional areas.
/// All three endpoints are elevated-only.
///
/// # Endpoints
///
/// - `GET    /v1/users/:id/modules` - List a user's grants
/// - `POST   /v1/users/:id/modules` - Grant a module
/// - `DELETE /v1/users/:id/modules/:module` - Revoke a module

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
        module_grant::{GrantOutcome, ModuleGrant},
        user::User,
    },
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

/// Grant request
#[derive(Debug, Deserialize, Validate)]
pub struct GrantRequest {
    /// Module name to grant
    #[validate(length(min = 1, max = 100, message = "Module name must be 1-100 characters"))]
    pub module_name: String,
}

/// Grant response
///
/// Granting an already-granted module succeeds with `already_granted: true`
/// instead of failing, so admin scripts can be re-run safely.
#[derive(Debug, Serialize)]
pub struct GrantResponse {
    /// User the grant applies to
    pub user_id: Uuid,

    /// Granted module
    pub module_name: String,

    /// Whether the pair was already granted before this call
    pub already_granted: bool,
}

/// List grants response
#[derive(Debug, Serialize)]
pub struct ListGrantsResponse {
    /// The user's grants, oldest first
    pub grants: Vec<ModuleGrant>,
}

/// List a user's module grants
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not elevated
/// - `404 Not Found`: User does not exist
pub async fn list_modules(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ListGrantsResponse>> {
    require_elevated(&ctx.user)?;

    User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let grants = ModuleGrant::list_by_user(&state.db, id).await?;

    Ok(Json(ListGrantsResponse { grants }))
}

/// Grant a module to a user
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not elevated
/// - `404 Not Found`: User does not exist
/// - `422 Unprocessable Entity`: Invalid module name
pub async fn grant_module(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<GrantRequest>,
) -> ApiResult<(StatusCode, Json<GrantResponse>)> {
    require_elevated(&ctx.user)?;

    req.validate().map_err(ApiError::from_validation_errors)?;

    User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let outcome = ModuleGrant::grant(&state.db, id, &req.module_name, ctx.user.id).await?;

    let (status, already_granted) = match outcome {
        GrantOutcome::Created(_) => {
            info!(user_id = %id, module = %req.module_name, actor = %ctx.user.id, "module granted");
            (StatusCode::CREATED, false)
        }
        GrantOutcome::AlreadyGranted => {
            warn!(user_id = %id, module = %req.module_name, "module already granted");
            (StatusCode::OK, true)
        }
    };

    Ok((
        status,
        Json(GrantResponse {
            user_id: id,
            module_name: req.module_name,
            already_granted,
        }),
    ))
}

/// Revoke a module from a user
///
/// Revocation takes effect on the user's next request; there is no grace
/// period.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not elevated
/// - `404 Not Found`: No such grant
pub async fn revoke_module(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path((id, module)): Path<(Uuid, String)>,
) -> ApiResult<StatusCode> {
    require_elevated(&ctx.user)?;

    let revoked = ModuleGrant::revoke(&state.db, id, &module).await?;
    if !revoked {
        return Err(ApiError::NotFound("Grant not found".to_string()));
    }

    info!(user_id = %id, module = %module, actor = %ctx.user.id, "module revoked");

    Ok(StatusCode::NO_CONTENT)
}
