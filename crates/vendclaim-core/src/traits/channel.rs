// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for outbound delivery to a messaging platform.

use async_trait::async_trait;

use crate::error::VendclaimError;
use crate::traits::adapter::PluginAdapter;
use crate::types::OutboundMessage;

/// Outbound half of a messaging platform integration.
///
/// Inbound traffic does not go through this trait: transports convert
/// platform updates into [`InboundEvent`](crate::types::InboundEvent)s and
/// hand them to an [`EventHandler`](crate::traits::EventHandler).
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Delivers a message. Failures are reported as [`VendclaimError::Channel`].
    async fn send(&self, msg: OutboundMessage) -> Result<(), VendclaimError>;
}
