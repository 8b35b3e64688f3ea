// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter that records what it is asked to send.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use vendclaim_core::{
    AdapterType, ChannelAdapter, ChatId, HealthStatus, OutboundMessage, PluginAdapter,
    VendclaimError,
};

/// A messaging channel that keeps every sent message for assertions.
pub struct MockChannel {
    sent: Mutex<Vec<OutboundMessage>>,
    failing: AtomicBool,
}

impl MockChannel {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Make subsequent sends fail with a channel error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All messages sent so far.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Messages sent to one chat.
    pub async fn sent_to(&self, chat: ChatId) -> Vec<OutboundMessage> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.recipient == chat)
            .cloned()
            .collect()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, VendclaimError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), VendclaimError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn send(&self, msg: OutboundMessage) -> Result<(), VendclaimError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(VendclaimError::Channel {
                message: format!("mock delivery to {} failed", msg.recipient),
                source: None,
            });
        }
        self.sent.lock().await.push(msg);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_captures_in_order() {
        let channel = MockChannel::new();
        channel
            .send(OutboundMessage::text(ChatId(1), "first"))
            .await
            .unwrap();
        channel
            .send(OutboundMessage::text(ChatId(2), "second"))
            .await
            .unwrap();

        let sent = channel.sent_messages().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].text, "first");
        assert_eq!(sent[1].text, "second");
        assert_eq!(channel.sent_to(ChatId(2)).await.len(), 1);

        channel.clear_sent().await;
        assert_eq!(channel.sent_count().await, 0);
    }

    #[tokio::test]
    async fn failing_channel_returns_channel_error() {
        let channel = MockChannel::new();
        channel.set_failing(true);
        let err = channel
            .send(OutboundMessage::text(ChatId(1), "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, VendclaimError::Channel { .. }));
        assert_eq!(channel.sent_count().await, 0);
    }
}
