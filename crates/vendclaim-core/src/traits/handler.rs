// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seams between transports and the dialogue core.

use async_trait::async_trait;

use crate::error::VendclaimError;
use crate::traits::channel::ChannelAdapter;
use crate::types::{InboundEvent, OutboundMessage};

/// Consumes one inbound event and produces the replies for its sender.
#[async_trait]
pub trait EventHandler: Send + Sync + 'static {
    /// Processes the event to completion. Never fails: every failure is
    /// turned into a user-visible reply inside the handler.
    async fn handle_event(&self, event: InboundEvent) -> Vec<OutboundMessage>;

    /// Processes the event and sends its replies through `out`, returning
    /// the delivery failures.
    ///
    /// The default sends after `handle_event` returns. Handlers that
    /// serialize events per sender override it to send before the sender's
    /// next event is processed.
    async fn respond(&self, event: InboundEvent, out: &dyn ChannelAdapter) -> Vec<VendclaimError> {
        let replies = self.handle_event(event).await;
        send_all(out, replies).await
    }
}

/// Sends `replies` in order, continuing past failures.
pub async fn send_all(out: &dyn ChannelAdapter, replies: Vec<OutboundMessage>) -> Vec<VendclaimError> {
    let mut failures = Vec::new();
    for reply in replies {
        if let Err(e) = out.send(reply).await {
            failures.push(e);
        }
    }
    failures
}

/// Receives raw webhook payloads pushed by a messaging platform.
#[async_trait]
pub trait WebhookSink: Send + Sync + 'static {
    /// Decodes and processes one webhook payload.
    ///
    /// Returns `Err` only when the payload cannot be decoded; processing
    /// failures are logged by the sink.
    async fn deliver(&self, payload: serde_json::Value) -> Result<(), VendclaimError>;
}
