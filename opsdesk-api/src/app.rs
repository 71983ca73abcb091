/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with all
/// routes and middleware.
///
/// # Example
///
/// ```no_run
/// use opsdesk_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = opsdesk_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post},
    Router,
};
use opsdesk_shared::auth::{context::AuthContext, jwt};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                           # Health check (public)
/// └── /v1/                              # API v1 (versioned)
///     ├── /auth/                        # Authentication (public)
///     │   ├── POST /register
///     │   ├── POST /login
///     │   └── POST /refresh
///     ├── /tasks/                       # Task workflow (authenticated)
///     │   ├── POST   /                  # Create task
///     │   ├── GET    /                  # List visible tasks
///     │   ├── GET    /:id               # Task detail
///     │   ├── DELETE /:id               # Delete task
///     │   ├── POST   /:id/status        # Workflow transition
///     │   ├── GET    /:id/comments      # List comments
///     │   ├── POST   /:id/comments      # Add comment
///     │   ├── POST   /:id/assignees     # Assign user
///     │   └── DELETE /:id/assignees/:user_id
///     ├── /notifications/               # In-app notifications
///     │   ├── GET  /unread
///     │   └── POST /:id/read
///     ├── /users/:id/modules            # Module grants (elevated only)
///     │   ├── GET    /
///     │   ├── POST   /
///     │   └── DELETE /:module
///     └── /stats                        # Dashboard counters
/// ```
///
/// Authorization beyond "has a valid token" lives in the handlers: each one
/// calls the access guards it needs, so the middleware stack stays thin.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // Task workflow routes
    let task_routes = Router::new()
        .route("/", post(routes::tasks::create_task))
        .route("/", get(routes::tasks::list_tasks))
        .route("/:id", get(routes::tasks::get_task))
        .route("/:id", delete(routes::tasks::delete_task))
        .route("/:id/status", post(routes::tasks::update_status))
        .route("/:id/comments", get(routes::tasks::list_comments))
        .route("/:id/comments", post(routes::tasks::add_comment))
        .route("/:id/assignees", post(routes::tasks::add_assignee))
        .route(
            "/:id/assignees/:user_id",
            delete(routes::tasks::remove_assignee),
        );

    // Notification routes
    let notification_routes = Router::new()
        .route("/unread", get(routes::notifications::list_unread))
        .route("/:id/read", post(routes::notifications::mark_read));

    // Module grant administration
    let module_routes = Router::new()
        .route("/:id/modules", get(routes::grants::list_modules))
        .route("/:id/modules", post(routes::grants::grant_module))
        .route("/:id/modules/:module", delete(routes::grants::revoke_module));

    // Dashboard counters
    let stats_routes = Router::new().route("/", get(routes::stats::get_stats));

    // Everything except /auth requires a valid access token
    let authenticated = Router::new()
        .nest("/tasks", task_routes)
        .nest("/notifications", notification_routes)
        .nest("/users", module_routes)
        .nest("/stats", stats_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new().nest("/auth", auth_routes).merge(authenticated);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Validates the bearer token, then loads the user row fresh so role
/// changes and deactivation take effect on the very next request. The
/// resulting [`AuthContext`] is injected into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| crate::error::ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    let auth_context = AuthContext::load(&state.db, &claims).await?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
