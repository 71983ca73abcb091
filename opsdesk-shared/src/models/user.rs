/// User model and database operations
///
/// Users are the actors of the system. Each user has exactly one role which
/// determines their default privilege tier; admin and manager are *elevated*
/// and bypass module grants and task visibility checks.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('admin', 'manager', 'staff', 'member');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     full_name VARCHAR(200) NOT NULL,
///     email VARCHAR(120) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'member',
///     department VARCHAR(100),
///     "position" VARCHAR(100),
///     phone VARCHAR(50),
///     telegram_chat_id VARCHAR(100),
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use opsdesk_shared::models::user::{User, CreateUser, UserRole};
///
/// # async fn example(pool: sqlx::PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     full_name: "Dilshod Karimov".to_string(),
///     email: "dilshod@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::Staff,
///     department: Some("Facilities".to_string()),
///     position: None,
///     phone: None,
///     telegram_chat_id: None,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User role determining the default privilege tier
///
/// Every role comparison in the codebase goes through [`UserRole::is_elevated`]
/// so the elevated set is defined in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full control, including task deletion and user management
    Admin,

    /// Approval authority: can complete tasks and manage grants
    Manager,

    /// Operational staff: works assigned tasks, self-reports completion
    Staff,

    /// Plain account with no implicit access
    Member,
}

impl UserRole {
    /// Converts role to string for display and logging
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::Staff => "staff",
            UserRole::Member => "member",
        }
    }

    /// Whether this role has implicit, grant-independent access to all
    /// modules and all tasks
    pub fn is_elevated(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Manager)
    }

    /// Whether this role may create and delete tasks
    pub fn can_manage_tasks(&self) -> bool {
        self.is_elevated()
    }

    /// Whether this role may grant or revoke module access
    pub fn can_manage_grants(&self) -> bool {
        self.is_elevated()
    }
}

/// User model representing an account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Display name
    pub full_name: String,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id password hash, never plaintext
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Role determining the privilege tier
    pub role: UserRole,

    /// Optional department
    pub department: Option<String>,

    /// Optional job position
    pub position: Option<String>,

    /// Optional phone number
    pub phone: Option<String>,

    /// Telegram chat identifier for external push delivery
    ///
    /// None means the user never linked the bot; no push is attempted.
    pub telegram_chat_id: Option<String>,

    /// Inactive accounts are denied everywhere, regardless of role or grants
    pub is_active: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub full_name: String,
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    #[serde(default = "default_role")]
    pub role: UserRole,

    pub department: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub telegram_chat_id: Option<String>,
}

fn default_role() -> UserRole {
    UserRole::Member
}

const USER_COLUMNS: &str = r#"id, full_name, email, password_hash, role, department,
            "position", phone, telegram_chat_id, is_active, created_at"#;

impl User {
    /// Creates a new user account
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint) or
    /// the database operation fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO users (full_name, email, password_hash, role, department, "position", phone, telegram_chat_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(data.full_name)
            .bind(data.email)
            .bind(data.password_hash)
            .bind(data.role)
            .bind(data.department)
            .bind(data.position)
            .bind(data.phone)
            .bind(data.telegram_chat_id)
            .fetch_one(pool)
            .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Finds a user by email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Lists active users with pagination, newest first
    pub async fn list_active(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE is_active = TRUE
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        );

        let users = sqlx::query_as::<_, User>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(users)
    }

    /// Deactivates a user account
    ///
    /// Deactivated accounts fail every access check; rows are kept for
    /// referential integrity (task creators, comment authors).
    pub async fn deactivate(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Sets or clears the Telegram chat identifier for push delivery
    pub async fn set_telegram_chat_id(
        pool: &PgPool,
        id: Uuid,
        chat_id: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET telegram_chat_id = $2 WHERE id = $1")
            .bind(id)
            .bind(chat_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_as_str() {
        assert_eq!(UserRole::Admin.as_str(), "admin");
        assert_eq!(UserRole::Manager.as_str(), "manager");
        assert_eq!(UserRole::Staff.as_str(), "staff");
        assert_eq!(UserRole::Member.as_str(), "member");
    }

    #[test]
    fn test_elevated_tiers() {
        assert!(UserRole::Admin.is_elevated());
        assert!(UserRole::Manager.is_elevated());
        assert!(!UserRole::Staff.is_elevated());
        assert!(!UserRole::Member.is_elevated());
    }

    #[test]
    fn test_tier_gated_capabilities() {
        assert!(UserRole::Manager.can_manage_tasks());
        assert!(UserRole::Manager.can_manage_grants());
        assert!(!UserRole::Staff.can_manage_tasks());
        assert!(!UserRole::Member.can_manage_grants());
    }

    #[test]
    fn test_default_role_is_member() {
        assert_eq!(default_role(), UserRole::Member);
    }

    #[test]
    fn test_role_serde_roundtrip() {
        let json = serde_json::to_string(&UserRole::Manager).unwrap();
        assert_eq!(json, "\"manager\"");
        let back: UserRole = serde_json::from_str("\"staff\"").unwrap();
        assert_eq!(back, UserRole::Staff);
    }

    // Integration tests for database operations require a live database
}
