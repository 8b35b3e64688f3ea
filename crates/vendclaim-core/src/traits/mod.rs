// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Adapters extend [`PluginAdapter`] and use `#[async_trait]` so they can
//! be held as trait objects.

pub mod adapter;
pub mod channel;
pub mod claims;
pub mod handler;

pub use adapter::PluginAdapter;
pub use channel::ChannelAdapter;
pub use claims::ClaimRepository;
pub use handler::{EventHandler, WebhookSink, send_all};
