/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and cleanup
/// - Test user creation per role
/// - JWT token generation
/// - Router construction

use opsdesk_api::app::{build_router, AppState};
use opsdesk_api::config::Config;
use opsdesk_shared::auth::jwt::{create_token, Claims, TokenType};
use opsdesk_shared::db::migrations::run_migrations;
use opsdesk_shared::models::module_grant::ModuleGrant;
use opsdesk_shared::models::user::{CreateUser, User, UserRole};
use sqlx::PgPool;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub admin: User,
    pub staff: User,
    admin_token: String,
    staff_token: String,
}

impl TestContext {
    /// Creates a new test context with a migrated database and two users:
    /// an admin and a staff member holding the tasks module grant.
    pub async fn new() -> anyhow::Result<Self> {
        // Load test configuration (DATABASE_URL and JWT_SECRET required)
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;
        run_migrations(&db).await?;

        let admin = create_test_user(&db, UserRole::Admin).await?;
        let staff = create_test_user(&db, UserRole::Staff).await?;

        ModuleGrant::grant(&db, staff.id, "tasks", admin.id).await?;

        let admin_token = token_for(&admin, &config)?;
        let staff_token = token_for(&staff, &config)?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            admin,
            staff,
            admin_token,
            staff_token,
        })
    }

    /// Returns the admin's authorization header value
    pub fn admin_auth(&self) -> String {
        format!("Bearer {}", self.admin_token)
    }

    /// Returns the staff member's authorization header value
    pub fn staff_auth(&self) -> String {
        format!("Bearer {}", self.staff_token)
    }

    /// Cleans up test data
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        for user in [&self.admin, &self.staff] {
            sqlx::query("DELETE FROM tasks WHERE created_by = $1")
                .bind(user.id)
                .execute(&self.db)
                .await?;
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(user.id)
                .execute(&self.db)
                .await?;
        }
        Ok(())
    }
}

async fn create_test_user(db: &PgPool, role: UserRole) -> anyhow::Result<User> {
    let user = User::create(
        db,
        CreateUser {
            full_name: "Test User".to_string(),
            email: format!("test-{}@example.com", Uuid::new_v4()),
            password_hash: "unused-in-tests".to_string(),
            role,
            department: None,
            position: None,
            phone: None,
            telegram_chat_id: None,
        },
    )
    .await?;

    Ok(user)
}

fn token_for(user: &User, config: &Config) -> anyhow::Result<String> {
    let claims = Claims::new(user.id, user.role, TokenType::Access);
    Ok(create_token(&claims, &config.jwt.secret)?)
}

/// Reads a response body as JSON
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body should be JSON")
}
