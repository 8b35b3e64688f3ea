// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared between the dialogue core and its adapters.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Stable identifier of a messaging-platform user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a chat that messages can be delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier assigned to a claim by the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClaimId(pub i64);

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a [`PluginAdapter`](crate::PluginAdapter).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Storage,
    Observability,
}

// --- Claims ---

/// Workflow status of a persisted claim.
///
/// The dialogue core only ever creates claims in [`ClaimStatus::New`]; the
/// other states belong to operator tooling.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    #[default]
    New,
    InProgress,
    Resolved,
    Rejected,
}

/// The fields of a claim collected by a completed dialogue, before insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClaim {
    pub user_id: UserId,
    pub username: Option<String>,
    pub phone: String,
    pub amount: u32,
    pub comment: String,
}

/// A persisted claim. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    /// RFC 3339 UTC timestamp assigned at insert time.
    pub created_at: String,
    pub user_id: UserId,
    pub username: Option<String>,
    pub phone: String,
    pub amount: u32,
    pub comment: String,
    pub status: ClaimStatus,
}

// --- Inbound events ---

/// Coarse classification of an inbound event, used for routing and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum EventKind {
    Command,
    Text,
    Contact,
    Callback,
}

/// The typed content of an inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    /// A slash command, name lowercased and without the leading `/`.
    Command { name: String, args: String },
    /// Free text typed by the user.
    Text(String),
    /// A contact shared through the platform's contact button.
    Contact { phone: String },
    /// A pressed inline button. `id` is the platform's query id, which the
    /// transport acknowledges on its own.
    Callback { id: String, data: String },
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::Command { .. } => EventKind::Command,
            EventPayload::Text(_) => EventKind::Text,
            EventPayload::Contact { .. } => EventKind::Contact,
            EventPayload::Callback { .. } => EventKind::Callback,
        }
    }
}

/// A single user action delivered by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub user_id: UserId,
    /// Chat that replies are routed to.
    pub chat_id: ChatId,
    pub username: Option<String>,
    pub payload: EventPayload,
}

// --- Outbound messages ---

/// A button on an inline keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub label: String,
    pub data: String,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// Keyboard attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Keyboard {
    /// One-time reply keyboard with a single "share contact" button.
    RequestContact { label: String },
    /// Inline keyboard, one inner vector per row.
    Inline(Vec<Vec<InlineButton>>),
    /// Removes a previously shown reply keyboard.
    Remove,
}

/// A message to be delivered by a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub recipient: ChatId,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl OutboundMessage {
    /// A plain text message without a keyboard.
    pub fn text(recipient: ChatId, text: impl Into<String>) -> Self {
        Self {
            recipient,
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}
