/// Database migration runner
///
/// Migrations are stored in the `migrations/` directory at the crate root and
/// embedded into the binary via `sqlx::migrate!`. Each file is an "up"
/// migration named `{timestamp}_{name}.sql`.
///
/// # Example
///
/// ```no_run
/// use opsdesk_shared::db::pool::{create_pool, DatabaseConfig};
/// use opsdesk_shared::db::migrations::run_migrations;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// };
///
/// let pool = create_pool(config).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{debug, info, warn};

/// Runs all pending database migrations
///
/// Migrations run in order; if one fails it is rolled back and an error is
/// returned.
///
/// # Errors
///
/// Returns an error if a migration fails to execute or the connection is
/// lost during migration.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("./migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Creates the database if it doesn't exist
///
/// Useful for development and testing. In production the database should
/// already exist.
///
/// # Errors
///
/// Returns an error if the PostgreSQL server is unreachable or the caller
/// lacks permission to create databases.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    info!("Checking if database exists");

    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
        info!("Database created successfully");
    } else {
        debug!("Database already exists");
    }

    Ok(())
}
