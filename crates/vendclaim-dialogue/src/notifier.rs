// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator notification for newly submitted claims.
//!
//! Best-effort: a failed delivery is logged and counted, never retried,
//! and never affects the stored claim.

use std::sync::Arc;

use tracing::{debug, info, warn};

use vendclaim_core::{ChannelAdapter, ChatId, ClaimId, NewClaim, OutboundMessage};

/// Result of a notification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// No operator is configured.
    Disabled,
    Delivered,
    Failed,
}

impl NotifyOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyOutcome::Disabled => "disabled",
            NotifyOutcome::Delivered => "delivered",
            NotifyOutcome::Failed => "failed",
        }
    }
}

/// Sends claim summaries to the operator chat.
pub struct Notifier {
    channel: Arc<dyn ChannelAdapter>,
    operator: Option<ChatId>,
}

impl Notifier {
    pub fn new(channel: Arc<dyn ChannelAdapter>, operator: Option<ChatId>) -> Self {
        match operator {
            Some(chat) => info!(operator_chat_id = chat.0, "operator notifications enabled"),
            None => info!("no operator chat configured, claim notifications disabled"),
        }
        Self { channel, operator }
    }

    pub fn operator(&self) -> Option<ChatId> {
        self.operator
    }

    /// Send the summary of a stored claim to the operator.
    pub async fn notify(&self, id: ClaimId, claim: &NewClaim) -> NotifyOutcome {
        let Some(operator) = self.operator else {
            debug!(claim_id = id.0, "notification skipped, no operator");
            vendclaim_prometheus::record_notification(NotifyOutcome::Disabled.as_str());
            return NotifyOutcome::Disabled;
        };

        let msg = OutboundMessage::text(operator, format_claim(id, claim));
        let outcome = match self.channel.send(msg).await {
            Ok(()) => {
                debug!(claim_id = id.0, "operator notified");
                NotifyOutcome::Delivered
            }
            Err(e) => {
                warn!(claim_id = id.0, error = %e, "failed to notify operator");
                NotifyOutcome::Failed
            }
        };
        vendclaim_prometheus::record_notification(outcome.as_str());
        outcome
    }
}

/// Plain-text claim summary for the operator.
pub fn format_claim(id: ClaimId, claim: &NewClaim) -> String {
    let from = match &claim.username {
        Some(username) => format!("@{username} (id {})", claim.user_id),
        None => format!("id {}", claim.user_id),
    };
    format!(
        "Новая заявка на возврат №{id}\n\
         Телефон: {phone}\n\
         Сумма: {amount}\n\
         Комментарий: {comment}\n\
         От: {from}",
        phone = claim.phone,
        amount = claim.amount,
        comment = claim.comment,
    )
}
