/// Authenticated request identity
///
/// Built once per request from validated token claims. The user row is
/// loaded fresh so role changes and deactivation apply immediately; the
/// role inside the token is never trusted for authorization.

use sqlx::PgPool;

use crate::auth::jwt::Claims;
use crate::models::user::User;

/// Error type for identity resolution
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    /// Token subject no longer exists
    #[error("Unknown user")]
    UnknownUser,

    /// Account is deactivated
    #[error("Account is inactive")]
    InactiveAccount,

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// The acting user behind a request
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Current user row, loaded at request time
    pub user: User,
}

impl AuthContext {
    /// Resolves validated claims to a live, active user
    pub async fn load(pool: &PgPool, claims: &Claims) -> Result<Self, ContextError> {
        let user = User::find_by_id(pool, claims.sub)
            .await?
            .ok_or(ContextError::UnknownUser)?;

        if !user.is_active {
            return Err(ContextError::InactiveAccount);
        }

        Ok(Self { user })
    }
}
