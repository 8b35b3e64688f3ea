// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maps channel-agnostic keyboards onto Telegram reply markup.

use teloxide::types::{
    ButtonRequest, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
    KeyboardRemove, ReplyMarkup,
};
use vendclaim_core::Keyboard;

pub fn to_reply_markup(keyboard: &Keyboard) -> ReplyMarkup {
    match keyboard {
        Keyboard::RequestContact { label } => {
            let button = KeyboardButton::new(label.clone()).request(ButtonRequest::Contact);
            ReplyMarkup::Keyboard(
                KeyboardMarkup::new(vec![vec![button]])
                    .resize_keyboard()
                    .one_time_keyboard(),
            )
        }
        Keyboard::Inline(rows) => {
            let rows = rows.iter().map(|row| {
                row.iter()
                    .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.data.clone()))
                    .collect::<Vec<_>>()
            });
            ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(rows))
        }
        Keyboard::Remove => ReplyMarkup::KeyboardRemove(KeyboardRemove::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vendclaim_core::InlineButton;

    fn json(keyboard: &Keyboard) -> serde_json::Value {
        serde_json::to_value(to_reply_markup(keyboard)).unwrap()
    }

    #[test]
    fn request_contact_is_one_time_reply_keyboard() {
        let value = json(&Keyboard::RequestContact {
            label: "Поделиться номером".into(),
        });
        assert_eq!(value["one_time_keyboard"], true);
        assert_eq!(value["resize_keyboard"], true);
        let button = &value["keyboard"][0][0];
        assert_eq!(button["text"], "Поделиться номером");
        assert_eq!(button["request_contact"], true);
    }

    #[test]
    fn inline_rows_keep_layout() {
        let value = json(&Keyboard::Inline(vec![
            vec![InlineButton::new("Пополнить", "topup")],
            vec![InlineButton::new("История", "history")],
        ]));
        let rows = value["inline_keyboard"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0]["callback_data"], "topup");
        assert_eq!(rows[1][0]["text"], "История");
    }

    #[test]
    fn remove_keyboard() {
        assert_eq!(json(&Keyboard::Remove)["remove_keyboard"], true);
    }
}
