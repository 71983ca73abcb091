/// Mock channel for testing
///
/// Records every send and can be told to fail for specific chat IDs, which
/// is how the tests verify that one broken recipient never blocks the rest
/// of a batch.

use crate::channels::{ChannelError, PushChannel};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

/// In-memory channel with failure injection
pub struct MockChannel {
    sent: Mutex<Vec<(String, String)>>,
    failing_chats: HashSet<String>,
}

impl MockChannel {
    /// Creates a channel that accepts everything
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing_chats: HashSet::new(),
        }
    }

    /// Creates a channel that rejects sends to the given chat IDs
    pub fn failing_for(chat_ids: &[&str]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing_chats: chat_ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Returns the (chat_id, body) pairs delivered so far
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().expect("mock lock poisoned").clone()
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PushChannel for MockChannel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(&self, chat_id: &str, body: &str) -> Result<(), ChannelError> {
        if self.failing_chats.contains(chat_id) {
            return Err(ChannelError::Rejected(format!(
                "chat {} configured to fail",
                chat_id
            )));
        }

        self.sent
            .lock()
            .expect("mock lock poisoned")
            .push((chat_id.to_string(), body.to_string()));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_sends() {
        let channel = MockChannel::new();
        channel.send("100", "hello").await.unwrap();
        channel.send("200", "world").await.unwrap();

        let sent = channel.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], ("100".to_string(), "hello".to_string()));
    }

    #[tokio::test]
    async fn test_mock_failure_injection() {
        let channel = MockChannel::failing_for(&["500"]);

        assert!(channel.send("100", "ok").await.is_ok());
        assert!(matches!(
            channel.send("500", "broken").await,
            Err(ChannelError::Rejected(_))
        ));
        assert_eq!(channel.sent().len(), 1);
    }
}
