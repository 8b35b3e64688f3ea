// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram transport for vendclaim.
//!
//! [`TelegramChannel`] delivers [`OutboundMessage`]s through the Bot API.
//! [`TelegramBridge`] takes updates from either long polling
//! ([`run_polling`]) or the HTTP webhook ([`WebhookSink`]), filters them by
//! the access policy, hands them to an [`EventHandler`] and sends the replies.

pub mod handler;
pub mod keyboard;
pub mod webhook;

use std::sync::Arc;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{Recipient, UpdateKind};
use teloxide::utils::command::BotCommands;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use vendclaim_config::model::TelegramConfig;
use vendclaim_core::{
    AdapterType, ChannelAdapter, EventHandler, HealthStatus, OutboundMessage, PluginAdapter,
    VendclaimError, WebhookSink,
};

pub use handler::AccessPolicy;

/// Commands shown in the Telegram client's command menu.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum Command {
    #[command(description = "приветствие")]
    Start,
    #[command(description = "список команд")]
    Help,
    #[command(description = "проверить, что бот работает")]
    Status,
    #[command(description = "главное меню")]
    Menu,
    #[command(description = "оформить заявку на возврат")]
    Claim,
    #[command(description = "отменить заявку")]
    Cancel,
}

/// Outbound half of the Telegram integration.
pub struct TelegramChannel {
    bot: Bot,
}

impl TelegramChannel {
    /// Creates the channel. Requires `config.bot_token` to be set.
    pub fn new(config: &TelegramConfig) -> Result<Self, VendclaimError> {
        let token = config.bot_token.as_deref().map(str::trim).ok_or_else(|| {
            VendclaimError::Config("telegram.bot_token is required for the Telegram transport".into())
        })?;

        if token.is_empty() {
            return Err(VendclaimError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        Ok(Self {
            bot: Bot::new(token),
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Publishes the command list shown by Telegram clients.
    pub async fn publish_commands(&self) -> Result<(), VendclaimError> {
        self.bot
            .set_my_commands(Command::bot_commands())
            .await
            .map_err(|e| VendclaimError::Channel {
                message: format!("failed to set bot commands: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, VendclaimError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), VendclaimError> {
        debug!("Telegram channel shutting down");
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn send(&self, msg: OutboundMessage) -> Result<(), VendclaimError> {
        let chat_id = teloxide::types::ChatId(msg.recipient.0);
        let mut request = self.bot.send_message(Recipient::Id(chat_id), msg.text);
        if let Some(keyboard) = &msg.keyboard {
            request = request.reply_markup(keyboard::to_reply_markup(keyboard));
        }

        request.await.map_err(|e| VendclaimError::Channel {
            message: format!("failed to send message: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(())
    }
}

/// Routes Telegram updates into an [`EventHandler`] and delivers its replies.
pub struct TelegramBridge {
    channel: Arc<TelegramChannel>,
    handler: Arc<dyn EventHandler>,
    access: AccessPolicy,
}

impl TelegramBridge {
    pub fn new(
        channel: Arc<TelegramChannel>,
        handler: Arc<dyn EventHandler>,
        config: &TelegramConfig,
    ) -> Self {
        Self {
            channel,
            handler,
            access: AccessPolicy {
                allowed_users: config.allowed_users.clone(),
                private_only: config.private_only,
            },
        }
    }

    /// Processes one update to completion.
    ///
    /// Callback queries are acknowledged first so the client stops its
    /// progress indicator whatever the outcome. Replies go out through
    /// [`EventHandler::respond`], which keeps one sender's replies in event
    /// order across concurrent webhook requests. Delivery failures are logged.
    pub async fn handle_update(&self, update: Update) {
        if let UpdateKind::CallbackQuery(query) = &update.kind
            && let Err(e) = self.channel.bot().answer_callback_query(query.id.clone()).await
        {
            warn!(error = %e, "failed to answer callback query");
        }

        if !self.access.permits(&update) {
            debug!(update_id = update.id.0, "ignoring update from unauthorized sender");
            return;
        }

        let Some(event) = handler::to_inbound_event(&update) else {
            debug!(update_id = update.id.0, "ignoring unsupported update");
            return;
        };

        let chat_id = event.chat_id;
        for e in self.handler.respond(event, &*self.channel).await {
            warn!(chat_id = chat_id.0, error = %e, "failed to deliver reply");
        }
    }
}

#[async_trait]
impl WebhookSink for TelegramBridge {
    async fn deliver(&self, payload: serde_json::Value) -> Result<(), VendclaimError> {
        let update: Update =
            serde_json::from_value(payload).map_err(|e| VendclaimError::Channel {
                message: format!("malformed Telegram update: {e}"),
                source: Some(Box::new(e)),
            })?;
        self.handle_update(update).await;
        Ok(())
    }
}

/// Runs long polling until `cancel` fires.
///
/// The teloxide dispatcher processes updates of one chat sequentially and
/// different chats concurrently.
pub async fn run_polling(bridge: Arc<TelegramBridge>, cancel: CancellationToken) {
    let bot = bridge.channel.bot().clone();
    let handler = dptree::endpoint(move |update: Update| {
        let bridge = bridge.clone();
        async move {
            bridge.handle_update(update).await;
            respond(())
        }
    });

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .default_handler(|_| async {})
        .build();

    let shutdown = dispatcher.shutdown_token();
    tokio::spawn(async move {
        cancel.cancelled().await;
        match shutdown.shutdown() {
            Ok(done) => done.await,
            Err(e) => debug!(error = %e, "dispatcher was not running at shutdown"),
        }
    });

    info!("starting Telegram long polling");
    dispatcher.dispatch().await;
    info!("Telegram long polling stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use vendclaim_core::InboundEvent;

    fn config(token: Option<&str>, allowed: &[&str]) -> TelegramConfig {
        TelegramConfig {
            bot_token: token.map(Into::into),
            allowed_users: allowed.iter().map(|s| s.to_string()).collect(),
            ..TelegramConfig::default()
        }
    }

    #[derive(Default)]
    struct CountingHandler {
        calls: AtomicUsize,
        responds: AtomicUsize,
    }

    #[async_trait]
    impl EventHandler for CountingHandler {
        async fn handle_event(&self, _event: InboundEvent) -> Vec<OutboundMessage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Vec::new()
        }

        async fn respond(
            &self,
            event: InboundEvent,
            _out: &dyn ChannelAdapter,
        ) -> Vec<VendclaimError> {
            self.responds.fetch_add(1, Ordering::SeqCst);
            self.handle_event(event).await;
            Vec::new()
        }
    }

    fn bridge(allowed: &[&str]) -> (TelegramBridge, Arc<CountingHandler>) {
        let cfg = config(Some("123456:test-token"), allowed);
        let channel = Arc::new(TelegramChannel::new(&cfg).unwrap());
        let counter = Arc::new(CountingHandler::default());
        (TelegramBridge::new(channel, counter.clone(), &cfg), counter)
    }

    #[test]
    fn new_requires_bot_token() {
        assert!(TelegramChannel::new(&config(None, &[])).is_err());
    }

    #[test]
    fn new_rejects_blank_token() {
        assert!(TelegramChannel::new(&config(Some("   "), &[])).is_err());
    }

    #[test]
    fn new_accepts_valid_token() {
        let cfg = config(Some("123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11"), &[]);
        assert!(TelegramChannel::new(&cfg).is_ok());
    }

    #[test]
    fn plugin_adapter_metadata() {
        let channel = TelegramChannel::new(&config(Some("test:token"), &[])).unwrap();
        assert_eq!(channel.name(), "telegram");
        assert_eq!(channel.version(), semver::Version::new(0, 1, 0));
        assert_eq!(channel.adapter_type(), AdapterType::Channel);
    }

    #[test]
    fn command_menu_lists_dialogue_commands() {
        let names: Vec<String> = Command::bot_commands()
            .into_iter()
            .map(|c| c.command)
            .collect();
        for expected in ["start", "help", "status", "menu", "claim", "cancel"] {
            assert!(
                names.iter().any(|n| n.trim_start_matches('/') == expected),
                "missing {expected} in {names:?}"
            );
        }
    }

    #[tokio::test]
    async fn malformed_payload_is_rejected() {
        let (bridge, counter) = bridge(&[]);
        let err = bridge
            .deliver(serde_json::json!({ "not": "an update" }))
            .await
            .unwrap_err();
        assert!(matches!(err, VendclaimError::Channel { .. }));
        assert_eq!(counter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unauthorized_update_never_reaches_handler() {
        let (bridge, counter) = bridge(&["1"]);
        bridge.handle_update(handler::tests::text_update(2, "/start")).await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn group_update_is_dropped_when_private_only() {
        let (bridge, counter) = bridge(&[]);
        bridge.handle_update(handler::tests::group_update(3, "hi")).await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn authorized_update_reaches_handler() {
        let (bridge, counter) = bridge(&[]);
        bridge.handle_update(handler::tests::text_update(4, "hi")).await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 1);
        assert_eq!(counter.responds.load(Ordering::SeqCst), 1, "replies go through respond");
    }
}
