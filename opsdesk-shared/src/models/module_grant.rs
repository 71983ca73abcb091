/// Module grant model and database operations
///
/// A module grant permits one user access to one named functional area
/// ("tasks", "vehicles", "contracts", ...). Elevated roles never need
/// grants; for everyone else, no grant means no access.
///
/// Module names are free-form strings on purpose: the console gates many
/// thin CRUD areas that are not modeled here.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE module_grants (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     module_name VARCHAR(100) NOT NULL,
///     granted_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     granted_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (user_id, module_name)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A per-(user, module) access grant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ModuleGrant {
    /// Unique grant ID
    pub id: Uuid,

    /// User the grant applies to
    pub user_id: Uuid,

    /// Named functional area
    pub module_name: String,

    /// Elevated actor who issued the grant
    pub granted_by: Option<Uuid>,

    /// When the grant was issued
    pub granted_at: DateTime<Utc>,
}

/// Outcome of a grant operation
///
/// Granting a module twice is not an error: the caller gets a signal that
/// the grant already existed so it can warn instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantOutcome {
    /// A new grant row was created
    Created(ModuleGrant),

    /// The (user, module) pair was already granted; nothing changed
    AlreadyGranted,
}

impl ModuleGrant {
    /// Grants a module to a user, treating duplicates as a no-op
    ///
    /// Uses `ON CONFLICT DO NOTHING` so two concurrent grants of the same
    /// pair cannot race into a constraint error.
    pub async fn grant(
        pool: &PgPool,
        user_id: Uuid,
        module_name: &str,
        granted_by: Uuid,
    ) -> Result<GrantOutcome, sqlx::Error> {
        let grant = sqlx::query_as::<_, ModuleGrant>(
            r#"
            INSERT INTO module_grants (user_id, module_name, granted_by)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, module_name) DO NOTHING
            RETURNING id, user_id, module_name, granted_by, granted_at
            "#,
        )
        .bind(user_id)
        .bind(module_name)
        .bind(granted_by)
        .fetch_optional(pool)
        .await?;

        match grant {
            Some(g) => Ok(GrantOutcome::Created(g)),
            None => Ok(GrantOutcome::AlreadyGranted),
        }
    }

    /// Revokes a module from a user
    ///
    /// Returns true if a grant row was deleted.
    pub async fn revoke(
        pool: &PgPool,
        user_id: Uuid,
        module_name: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM module_grants WHERE user_id = $1 AND module_name = $2")
                .bind(user_id)
                .bind(module_name)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Checks whether a grant exists for (user, module)
    pub async fn exists(
        pool: &PgPool,
        user_id: Uuid,
        module_name: &str,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM module_grants
                WHERE user_id = $1 AND module_name = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(module_name)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Lists a user's grants
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let grants = sqlx::query_as::<_, ModuleGrant>(
            r#"
            SELECT id, user_id, module_name, granted_by, granted_at
            FROM module_grants
            WHERE user_id = $1
            ORDER BY granted_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(grants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_outcome_eq() {
        assert_eq!(GrantOutcome::AlreadyGranted, GrantOutcome::AlreadyGranted);
    }

    // Integration tests for database operations require a live database
}
