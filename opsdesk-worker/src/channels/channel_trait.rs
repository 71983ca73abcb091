/// Core PushChannel trait
///
/// The contract every external delivery transport implements. A send
/// either succeeds or returns an error describing why; the channel itself
/// never retries, parks, or logs the row. Settlement is the deliverer's
/// job.
///
/// # Example
///
/// ```no_run
/// use opsdesk_worker::channels::{ChannelError, PushChannel};
/// use async_trait::async_trait;
///
/// struct StdoutChannel;
///
/// #[async_trait]
/// impl PushChannel for StdoutChannel {
///     fn name(&self) -> &str {
///         "stdout"
///     }
///
///     async fn send(&self, chat_id: &str, body: &str) -> Result<(), ChannelError> {
///         println!("[{}] {}", chat_id, body);
///         Ok(())
///     }
/// }
/// ```

use async_trait::async_trait;

/// Channel error types
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Network failure reaching the channel
    #[error("Transport error: {0}")]
    Transport(String),

    /// The channel answered but refused the message
    #[error("Message rejected: {0}")]
    Rejected(String),

    /// The channel did not answer within the timeout
    #[error("Delivery timed out")]
    Timeout,
}

/// A transport that delivers one message to one external chat
#[async_trait]
pub trait PushChannel: Send + Sync {
    /// Channel name for logging
    fn name(&self) -> &str;

    /// Delivers one message; bounded in time by the implementation
    async fn send(&self, chat_id: &str, body: &str) -> Result<(), ChannelError>;
}
