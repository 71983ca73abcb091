//! # OpsDesk Push Worker
//!
//! Polls the push outbox and delivers queued messages through the Telegram
//! channel. Runs alongside the API server against the same database.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p opsdesk-worker
//! ```

use opsdesk_worker::{
    channels::TelegramChannel,
    config::WorkerConfig,
    deliverer::Deliverer,
};
use opsdesk_shared::db;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "opsdesk_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "OpsDesk Push Worker v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = WorkerConfig::from_env()?;

    let pool = db::pool::create_pool(db::pool::DatabaseConfig {
        url: config.database_url.clone(),
        ..Default::default()
    })
    .await?;

    let channel = TelegramChannel::new(&config.telegram_bot_token, config.request_timeout)?;

    let deliverer = Deliverer::new(
        pool.clone(),
        Arc::new(channel),
        config.batch_size,
        config.max_attempts,
    );

    let shutdown = CancellationToken::new();

    let worker = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            deliverer.run(config.poll_interval, shutdown).await;
        })
    };

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, exiting...");
    shutdown.cancel();
    worker.await?;

    db::pool::close_pool(pool).await;

    Ok(())
}
