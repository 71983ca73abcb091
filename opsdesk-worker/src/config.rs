/// Configuration management for the push worker
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `TELEGRAM_BOT_TOKEN`: Bot token for the Telegram channel (required)
/// - `PUSH_POLL_INTERVAL_SECONDS`: Queue poll interval (default: 5)
/// - `PUSH_BATCH_SIZE`: Rows claimed per poll (default: 20)
/// - `PUSH_MAX_ATTEMPTS`: Attempts before a row is parked as failed (default: 5)
/// - `PUSH_REQUEST_TIMEOUT_SECONDS`: Per-send timeout (default: 10)

use std::env;
use std::time::Duration;

/// Push worker configuration
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Telegram bot token
    pub telegram_bot_token: String,

    /// How often to poll the outbox
    pub poll_interval: Duration,

    /// Rows claimed per poll
    pub batch_size: i64,

    /// Attempts before a row is parked as failed
    pub max_attempts: i32,

    /// Per-send timeout
    pub request_timeout: Duration,
}

impl WorkerConfig {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or have invalid
    /// values.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let telegram_bot_token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow::anyhow!("TELEGRAM_BOT_TOKEN environment variable is required"))?;

        let poll_interval_seconds = env::var("PUSH_POLL_INTERVAL_SECONDS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u64>()?;

        let batch_size = env::var("PUSH_BATCH_SIZE")
            .unwrap_or_else(|_| "20".to_string())
            .parse::<i64>()?;

        let max_attempts = env::var("PUSH_MAX_ATTEMPTS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<i32>()?;

        let request_timeout_seconds = env::var("PUSH_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()?;

        if batch_size < 1 {
            anyhow::bail!("PUSH_BATCH_SIZE must be at least 1");
        }

        if max_attempts < 1 {
            anyhow::bail!("PUSH_MAX_ATTEMPTS must be at least 1");
        }

        Ok(Self {
            database_url,
            telegram_bot_token,
            poll_interval: Duration::from_secs(poll_interval_seconds),
            batch_size,
            max_attempts,
            request_timeout: Duration::from_secs(request_timeout_seconds),
        })
    }
}
