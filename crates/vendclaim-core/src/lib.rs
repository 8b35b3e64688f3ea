// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Vendclaim claim-intake bot.
//!
//! This crate holds the domain types, the error type, and the adapter
//! traits that connect the dialogue core to transports and storage.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VendclaimError;
pub use types::{
    AdapterType, ChatId, Claim, ClaimId, ClaimStatus, EventKind, EventPayload, HealthStatus,
    InboundEvent, InlineButton, Keyboard, NewClaim, OutboundMessage, UserId,
};

pub use traits::{
    ChannelAdapter, ClaimRepository, EventHandler, PluginAdapter, WebhookSink, send_all,
};
