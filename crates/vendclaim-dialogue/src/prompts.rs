// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing texts and keyboards.

use vendclaim_core::{ChatId, ClaimId, InlineButton, Keyboard, OutboundMessage};

pub const GREETING: &str = "Привет! Я бот для управления водоматом.\n\
    Используй /help, чтобы увидеть доступные команды.";

pub const HELP: &str = "Доступные команды:\n\
    /start - запуск бота\n\
    /help - помощь\n\
    /status - статус\n\
    /menu - главное меню\n\
    /claim - заявка на возврат денег\n\
    /cancel - отменить заявку";

pub const MENU_TITLE: &str = "Главное меню:";
pub const TOPUP_NOT_IMPLEMENTED: &str = "Функция пополнения баланса пока не реализована.";
pub const HISTORY_NOT_IMPLEMENTED: &str = "История операций пока не реализована.";

pub const ASK_PHONE: &str =
    "Отправьте номер телефона кнопкой ниже или введите его сообщением.";
pub const SHARE_CONTACT_LABEL: &str = "Отправить номер";
pub const PHONE_EMPTY: &str = "Номер телефона не может быть пустым. \
    Отправьте номер кнопкой ниже или введите его сообщением.";

pub const ASK_AMOUNT: &str = "Введите сумму к возврату: только цифры, не больше 6 знаков.";
pub const AMOUNT_INVALID: &str =
    "Сумма должна состоять только из цифр (от 1 до 6 знаков). Попробуйте ещё раз.";

pub const ASK_COMMENT: &str = "Опишите, что произошло.";
pub const COMMENT_EMPTY: &str = "Комментарий не может быть пустым. Опишите, что произошло.";

pub const SAVE_FAILED: &str =
    "Не удалось сохранить заявку. Пожалуйста, отправьте комментарий ещё раз.";

pub const CANCELLED: &str = "Оформление заявки отменено.";
pub const NOTHING_TO_CANCEL: &str = "Активной заявки нет.";
pub const IDLE_HINT: &str =
    "Чтобы оформить возврат денег, нажмите /claim. Список команд: /help.";

pub const CALLBACK_TOPUP: &str = "topup";
pub const CALLBACK_HISTORY: &str = "history";
pub const CALLBACK_CLAIM: &str = "claim";

pub fn greeting(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, GREETING).with_keyboard(Keyboard::Remove)
}

pub fn help(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, HELP)
}

/// Liveness reply with the server's UTC time.
pub fn status(chat: ChatId, now: chrono::DateTime<chrono::Utc>) -> OutboundMessage {
    OutboundMessage::text(
        chat,
        format!(
            "Бот жив. Серверное время: {} UTC",
            now.format("%Y-%m-%d %H:%M:%S")
        ),
    )
}

/// Main menu, one button per row.
pub fn menu(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, MENU_TITLE).with_keyboard(Keyboard::Inline(vec![
        vec![InlineButton::new("Пополнить баланс", CALLBACK_TOPUP)],
        vec![InlineButton::new("История операций", CALLBACK_HISTORY)],
        vec![InlineButton::new("Вернуть деньги", CALLBACK_CLAIM)],
    ]))
}

pub fn ask_phone(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, ASK_PHONE).with_keyboard(contact_keyboard())
}

pub fn phone_empty(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, PHONE_EMPTY).with_keyboard(contact_keyboard())
}

pub fn ask_amount(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, ASK_AMOUNT).with_keyboard(Keyboard::Remove)
}

pub fn amount_invalid(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, AMOUNT_INVALID)
}

pub fn ask_comment(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, ASK_COMMENT)
}

pub fn comment_empty(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, COMMENT_EMPTY)
}

pub fn submitted(chat: ChatId, id: ClaimId) -> OutboundMessage {
    OutboundMessage::text(
        chat,
        format!("Спасибо! Заявка №{id} принята, оператор свяжется с вами."),
    )
}

pub fn save_failed(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, SAVE_FAILED)
}

pub fn cancelled(chat: ChatId, had_dialogue: bool) -> OutboundMessage {
    let text = if had_dialogue {
        CANCELLED
    } else {
        NOTHING_TO_CANCEL
    };
    OutboundMessage::text(chat, text).with_keyboard(Keyboard::Remove)
}

pub fn idle_hint(chat: ChatId) -> OutboundMessage {
    OutboundMessage::text(chat, IDLE_HINT)
}

pub fn not_implemented(chat: ChatId, text: &'static str) -> OutboundMessage {
    OutboundMessage::text(chat, text)
}

fn contact_keyboard() -> Keyboard {
    Keyboard::RequestContact {
        label: SHARE_CONTACT_LABEL.to_string(),
    }
}
