// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update conversion and access filtering.
//!
//! Turns a Telegram [`Update`] into a channel-agnostic [`InboundEvent`] and
//! decides whether the sender may talk to the bot at all.

use teloxide::types::{Chat, ChatKind, Update, UpdateKind, User};
use vendclaim_core::{ChatId, EventPayload, InboundEvent, UserId};

/// Who may use the bot, as configured in `[telegram]`.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    pub allowed_users: Vec<String>,
    pub private_only: bool,
}

impl AccessPolicy {
    /// Checks the sender and chat of an update against the policy.
    ///
    /// Updates without a sender are never permitted.
    pub fn permits(&self, update: &Update) -> bool {
        let Some((user, chat)) = sender_and_chat(update) else {
            return false;
        };
        if self.private_only && chat.is_some_and(|c| !is_dm(c)) {
            return false;
        }
        is_authorized(user, &self.allowed_users)
    }
}

/// Checks whether a user is listed in `allowed_users`.
///
/// Entries match the numeric user id or the username (with or without `@`,
/// case-insensitive). An empty list admits everyone.
pub fn is_authorized(user: &User, allowed_users: &[String]) -> bool {
    if allowed_users.is_empty() {
        return true;
    }

    let user_id_str = user.id.0.to_string();
    allowed_users.iter().any(|allowed| {
        if *allowed == user_id_str {
            return true;
        }
        let allowed_clean = allowed.strip_prefix('@').unwrap_or(allowed);
        user.username
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case(allowed_clean))
    })
}

/// Checks whether the chat is a private (DM) chat.
pub fn is_dm(chat: &Chat) -> bool {
    matches!(chat.kind, ChatKind::Private(_))
}

/// Converts an update into an [`InboundEvent`].
///
/// Returns `None` for update kinds the bot does not handle (edited messages,
/// stickers, channel posts, ...).
pub fn to_inbound_event(update: &Update) -> Option<InboundEvent> {
    match &update.kind {
        UpdateKind::Message(msg) => {
            let user = msg.from.as_ref()?;
            let payload = if let Some(contact) = msg.contact() {
                EventPayload::Contact {
                    phone: contact.phone_number.clone(),
                }
            } else if let Some(text) = msg.text() {
                parse_text(text)
            } else {
                return None;
            };
            Some(InboundEvent {
                user_id: UserId(user.id.0 as i64),
                chat_id: ChatId(msg.chat.id.0),
                username: user.username.clone(),
                payload,
            })
        }
        UpdateKind::CallbackQuery(query) => {
            let chat_id = query
                .message
                .as_ref()
                .map(|m| m.chat().id.0)
                .unwrap_or(query.from.id.0 as i64);
            Some(InboundEvent {
                user_id: UserId(query.from.id.0 as i64),
                chat_id: ChatId(chat_id),
                username: query.from.username.clone(),
                payload: EventPayload::Callback {
                    id: query.id.to_string(),
                    data: query.data.clone().unwrap_or_default(),
                },
            })
        }
        _ => None,
    }
}

/// Splits a `/command@botname args` line into a command payload; anything
/// else is plain text.
pub fn parse_text(text: &str) -> EventPayload {
    let Some(rest) = text.strip_prefix('/') else {
        return EventPayload::Text(text.to_string());
    };

    let (head, args) = match rest.split_once(char::is_whitespace) {
        Some((head, args)) => (head, args.trim()),
        None => (rest, ""),
    };
    let name = head.split_once('@').map_or(head, |(name, _)| name);

    EventPayload::Command {
        name: name.to_lowercase(),
        args: args.to_string(),
    }
}

fn sender_and_chat(update: &Update) -> Option<(&User, Option<&Chat>)> {
    match &update.kind {
        UpdateKind::Message(msg) => msg.from.as_ref().map(|u| (u, Some(&msg.chat))),
        UpdateKind::CallbackQuery(query) => {
            Some((&query.from, query.message.as_ref().map(|m| m.chat())))
        }
        _ => None,
    }
}
