/// Telegram push channel
///
/// Delivers messages via the Telegram Bot API `sendMessage` method. Every
/// request carries a hard timeout so one slow delivery cannot stall the
/// batch.

use crate::channels::{ChannelError, PushChannel};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

/// Telegram Bot API channel
pub struct TelegramChannel {
    client: reqwest::Client,
    api_url: String,
}

impl TelegramChannel {
    /// Creates a channel for the given bot token
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(bot_token: &str, request_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(request_timeout).build()?;

        Ok(Self {
            client,
            api_url: format!("https://api.telegram.org/bot{}/sendMessage", bot_token),
        })
    }
}

#[async_trait]
impl PushChannel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, chat_id: &str, body: &str) -> Result<(), ChannelError> {
        let response = self
            .client
            .post(&self.api_url)
            .json(&json!({
                "chat_id": chat_id,
                "text": body,
            }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChannelError::Timeout
                } else {
                    ChannelError::Transport(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(ChannelError::Rejected(format!("{}: {}", status, detail)));
        }

        Ok(())
    }
}
