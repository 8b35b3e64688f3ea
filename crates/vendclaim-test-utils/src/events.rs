// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound event builders. The chat id equals the user id, as in a
//! private chat.

use vendclaim_core::{ChatId, EventPayload, InboundEvent, UserId};

pub fn event(user: i64, payload: EventPayload) -> InboundEvent {
    InboundEvent {
        user_id: UserId(user),
        chat_id: ChatId(user),
        username: Some(format!("user{user}")),
        payload,
    }
}

/// `/name` with no arguments.
pub fn command(user: i64, name: &str) -> InboundEvent {
    event(
        user,
        EventPayload::Command {
            name: name.to_string(),
            args: String::new(),
        },
    )
}

pub fn text(user: i64, text: &str) -> InboundEvent {
    event(user, EventPayload::Text(text.to_string()))
}

pub fn contact(user: i64, phone: &str) -> InboundEvent {
    event(
        user,
        EventPayload::Contact {
            phone: phone.to_string(),
        },
    )
}

pub fn callback(user: i64, data: &str) -> InboundEvent {
    event(
        user,
        EventPayload::Callback {
            id: format!("cbq-{user}"),
            data: data.to_string(),
        },
    )
}
