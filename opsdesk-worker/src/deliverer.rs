/// Outbox deliverer
///
/// Claims pending push rows in batches and hands each one to the channel.
/// Rows are independent: a failed send settles its own row and the loop
/// moves on, so one unreachable recipient never blocks the rest of the
/// queue. Channel errors are recorded on the row and logged, never
/// propagated.

use crate::channels::{ChannelError, PushChannel};
use opsdesk_shared::notify::PushOutbox;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Drains the push outbox through a channel
pub struct Deliverer {
    pool: PgPool,
    channel: Arc<dyn PushChannel>,
    batch_size: i64,
    max_attempts: i32,
}

impl Deliverer {
    /// Creates a deliverer
    pub fn new(
        pool: PgPool,
        channel: Arc<dyn PushChannel>,
        batch_size: i64,
        max_attempts: i32,
    ) -> Self {
        Self {
            pool,
            channel,
            batch_size,
            max_attempts,
        }
    }

    /// Polls the outbox until cancelled
    pub async fn run(&self, poll_interval: Duration, shutdown: CancellationToken) {
        info!(
            channel = self.channel.name(),
            batch_size = self.batch_size,
            "push deliverer started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("push deliverer shutting down");
                    return;
                }
                _ = tokio::time::sleep(poll_interval) => {}
            }

            match self.run_once().await {
                Ok(0) => {}
                Ok(n) => debug!(delivered_batch = n, "processed outbox batch"),
                Err(e) => warn!(error = %e, "outbox poll failed"),
            }
        }
    }

    /// Claims and processes one batch; returns the number of rows handled
    ///
    /// Only claim and settlement errors surface here; per-row channel
    /// failures are settled on the row itself.
    pub async fn run_once(&self) -> Result<usize, sqlx::Error> {
        let rows = PushOutbox::claim_batch(&self.pool, self.batch_size, self.max_attempts).await?;
        if rows.is_empty() {
            return Ok(0);
        }

        let outcomes = attempt_all(self.channel.as_ref(), &rows).await;
        let handled = outcomes.len();

        for (id, outcome) in outcomes {
            match outcome {
                Ok(()) => {
                    PushOutbox::mark_sent(&self.pool, id).await?;
                }
                Err(e) => {
                    warn!(outbox_id = %id, error = %e, "push delivery failed");
                    PushOutbox::mark_failed(&self.pool, id, &e.to_string(), self.max_attempts)
                        .await?;
                }
            }
        }

        Ok(handled)
    }
}

/// Attempts delivery of every row, regardless of earlier failures
///
/// Pure with respect to the database: settlement belongs to the caller.
pub async fn attempt_all(
    channel: &dyn PushChannel,
    rows: &[PushOutbox],
) -> Vec<(Uuid, Result<(), ChannelError>)> {
    let mut outcomes = Vec::with_capacity(rows.len());

    for row in rows {
        let outcome = channel.send(&row.chat_id, &row.body).await;
        outcomes.push((row.id, outcome));
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::MockChannel;
    use chrono::Utc;
    use opsdesk_shared::notify::PushState;

    fn outbox_row(chat_id: &str, body: &str) -> PushOutbox {
        PushOutbox {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            chat_id: chat_id.to_string(),
            body: body.to_string(),
            state: PushState::Pending,
            attempts: 1,
            last_error: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_one_failing_recipient_does_not_block_others() {
        let channel = MockChannel::failing_for(&["broken"]);
        let rows = vec![
            outbox_row("100", "first"),
            outbox_row("broken", "second"),
            outbox_row("300", "third"),
        ];

        let outcomes = attempt_all(&channel, &rows).await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].1.is_ok());
        assert!(outcomes[1].1.is_err());
        assert!(outcomes[2].1.is_ok());

        // Both healthy recipients got their messages despite the failure
        // between them.
        let sent = channel.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, "100");
        assert_eq!(sent[1].0, "300");
    }

    #[tokio::test]
    async fn test_outcomes_keep_row_identity() {
        let channel = MockChannel::new();
        let rows = vec![outbox_row("100", "only")];

        let outcomes = attempt_all(&channel, &rows).await;

        assert_eq!(outcomes[0].0, rows[0].id);
    }

    // Claim and settlement against the queue require a live database
}
