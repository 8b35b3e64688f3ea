// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vendclaim serve` and `vendclaim poll` command implementations.
//!
//! Both modes wire SQLite storage, the dialogue controller and the Telegram
//! transport together and keep the HTTP gateway up for the hosting
//! platform's liveness probe. They differ in how updates arrive: `serve`
//! registers a webhook routed through the gateway, `poll` runs the teloxide
//! dispatcher.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};
use vendclaim_config::model::VendclaimConfig;
use vendclaim_core::{ChatId, ClaimRepository, VendclaimError, WebhookSink};
use vendclaim_dialogue::{DialogueController, DialogueStore, Notifier};
use vendclaim_gateway::{GatewayConfig, GatewayState};
use vendclaim_storage::SqliteClaimStore;
use vendclaim_telegram::{TelegramBridge, TelegramChannel, webhook};

use crate::shutdown;

type RenderFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Everything both run modes share.
struct Runtime {
    storage: Arc<SqliteClaimStore>,
    channel: Arc<TelegramChannel>,
    bridge: Arc<TelegramBridge>,
    prometheus_render: Option<RenderFn>,
}

impl Runtime {
    async fn assemble(config: &VendclaimConfig) -> Result<Self, VendclaimError> {
        let prometheus_render = init_prometheus(config);

        let storage = Arc::new(SqliteClaimStore::new(config.storage.clone()));
        storage.initialize().await?;
        info!(path = config.storage.database_path.as_str(), "claim storage ready");

        let channel = Arc::new(TelegramChannel::new(&config.telegram).map_err(|e| {
            eprintln!(
                "error: Telegram bot token required. Set BOT_TOKEN or telegram.bot_token in vendclaim.toml"
            );
            e
        })?);
        if let Err(e) = channel.publish_commands().await {
            warn!(error = %e, "failed to publish the command menu, continuing");
        }

        let notifier = Notifier::new(
            channel.clone(),
            config.telegram.operator_chat_id.map(ChatId),
        );
        let store = DialogueStore::with_expiry(
            config.dialogue.expire_after_secs.map(Duration::from_secs),
        );
        let controller = Arc::new(DialogueController::new(store, storage.clone(), notifier));
        let bridge = Arc::new(TelegramBridge::new(
            channel.clone(),
            controller,
            &config.telegram,
        ));

        Ok(Self {
            storage,
            channel,
            bridge,
            prometheus_render,
        })
    }

    fn gateway_state(
        &self,
        config: &VendclaimConfig,
        sink: Option<Arc<dyn WebhookSink>>,
    ) -> GatewayState {
        GatewayState {
            sink,
            storage: self.storage.clone(),
            secret_token: config.server.secret_token.clone(),
            prometheus_render: self.prometheus_render.clone(),
            start_time: Instant::now(),
        }
    }

    async fn close(&self) {
        if let Err(e) = self.storage.close().await {
            warn!(error = %e, "failed to checkpoint claim storage on shutdown");
        }
    }
}

/// Runs the `vendclaim serve` command: webhook mode.
pub async fn run_serve(config: VendclaimConfig) -> Result<(), VendclaimError> {
    init_tracing(&config.bot.log_level);
    info!(name = config.bot.name.as_str(), "starting vendclaim serve");
    log_token_diagnostics(&config);

    let runtime = Runtime::assemble(&config).await?;
    webhook::register_webhook(runtime.channel.bot(), &config.server).await?;

    let cancel = shutdown::install_signal_handler();
    let sink: Arc<dyn WebhookSink> = runtime.bridge.clone();
    let state = runtime.gateway_state(&config, Some(sink));
    let served =
        vendclaim_gateway::start_server(&gateway_config(&config), state, cancel.clone()).await;

    if let Err(e) = webhook::delete_webhook(runtime.channel.bot(), false).await {
        warn!(error = %e, "failed to delete webhook on shutdown");
    }
    runtime.close().await;

    served?;
    info!("vendclaim serve shutdown complete");
    Ok(())
}

/// Runs the `vendclaim poll` command: long polling plus the liveness server.
pub async fn run_poll(config: VendclaimConfig) -> Result<(), VendclaimError> {
    init_tracing(&config.bot.log_level);
    info!(name = config.bot.name.as_str(), "starting vendclaim poll");
    log_token_diagnostics(&config);

    let runtime = Runtime::assemble(&config).await?;
    // Polling and an active webhook are mutually exclusive on the Bot API side.
    let bot = runtime.channel.bot();
    if let Err(e) = webhook::delete_webhook(bot, config.server.drop_pending_updates).await {
        warn!(error = %e, "failed to delete webhook before polling");
    }

    let cancel = shutdown::install_signal_handler();
    let state = runtime.gateway_state(&config, None);
    let gateway_cfg = gateway_config(&config);
    let gateway_cancel = cancel.clone();
    let gateway = tokio::spawn(async move {
        vendclaim_gateway::start_server(&gateway_cfg, state, gateway_cancel).await
    });

    vendclaim_telegram::run_polling(runtime.bridge.clone(), cancel.clone()).await;
    // The dispatcher can also stop on its own; take the gateway down with it.
    cancel.cancel();

    match gateway.await {
        Ok(Ok(())) => debug!("gateway task finished"),
        Ok(Err(e)) => error!(error = %e, "gateway server failed"),
        Err(e) => error!(error = %e, "gateway task panicked"),
    }
    runtime.close().await;

    info!("vendclaim poll shutdown complete");
    Ok(())
}

fn gateway_config(config: &VendclaimConfig) -> GatewayConfig {
    GatewayConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        webhook_path: config.server.webhook_path.clone(),
    }
}

fn init_prometheus(config: &VendclaimConfig) -> Option<RenderFn> {
    if !config.prometheus.enabled {
        debug!("prometheus metrics disabled by configuration");
        return None;
    }
    match vendclaim_prometheus::PrometheusAdapter::new() {
        Ok(adapter) => {
            info!("prometheus metrics enabled");
            let handle = adapter.handle().clone();
            Some(Arc::new(move || handle.render()) as RenderFn)
        }
        Err(e) => {
            warn!(error = %e, "prometheus initialization failed, continuing without metrics");
            None
        }
    }
}

/// Shape of the configured bot token, safe to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TokenDiagnostics {
    pub length: usize,
    pub has_colon: bool,
    pub has_whitespace: bool,
}

impl TokenDiagnostics {
    pub(crate) fn of(token: &str) -> Self {
        Self {
            length: token.len(),
            has_colon: token.contains(':'),
            has_whitespace: token.chars().any(char::is_whitespace),
        }
    }
}

/// Logs the shape of the bot token without logging the token.
fn log_token_diagnostics(config: &VendclaimConfig) {
    match config.telegram.bot_token.as_deref() {
        Some(token) => {
            let diag = TokenDiagnostics::of(token);
            info!(
                length = diag.length,
                has_colon = diag.has_colon,
                has_whitespace = diag.has_whitespace,
                "bot token loaded"
            );
        }
        None => warn!("no bot token configured"),
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vendclaim={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
