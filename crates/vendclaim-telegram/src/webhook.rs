// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook registration with the Bot API.

use teloxide::prelude::*;
use tracing::info;
use url::Url;
use vendclaim_config::model::ServerConfig;
use vendclaim_core::VendclaimError;

/// Resolves the public URL Telegram should post updates to.
///
/// A bare origin (`https://host` or `https://host/`) gets `webhook_path`
/// appended; a URL that already carries a path is used as-is.
pub fn webhook_endpoint(webhook_url: &str, webhook_path: &str) -> Result<Url, VendclaimError> {
    let trimmed = webhook_url.trim();
    if trimmed.is_empty() {
        return Err(VendclaimError::Config(
            "server.webhook_url is empty; set it to the public https URL of this service".into(),
        ));
    }

    let mut url = Url::parse(trimmed)
        .map_err(|e| VendclaimError::Config(format!("invalid server.webhook_url: {e}")))?;
    if url.path().is_empty() || url.path() == "/" {
        url.set_path(webhook_path);
    }
    Ok(url)
}

/// Registers the webhook and returns the URL it was registered at.
pub async fn register_webhook(bot: &Bot, server: &ServerConfig) -> Result<Url, VendclaimError> {
    let webhook_url = server.webhook_url.as_deref().ok_or_else(|| {
        VendclaimError::Config("server.webhook_url is required in webhook mode".into())
    })?;
    let url = webhook_endpoint(webhook_url, &server.webhook_path)?;

    let mut request = bot
        .set_webhook(url.clone())
        .drop_pending_updates(server.drop_pending_updates);
    if let Some(secret) = &server.secret_token {
        request = request.secret_token(secret.clone());
    }
    request.await.map_err(|e| VendclaimError::Channel {
        message: format!("failed to register webhook: {e}"),
        source: Some(Box::new(e)),
    })?;

    info!(url = %url, "webhook registered");
    Ok(url)
}

/// Removes the webhook so the bot stops receiving pushes.
pub async fn delete_webhook(bot: &Bot, drop_pending_updates: bool) -> Result<(), VendclaimError> {
    bot.delete_webhook()
        .drop_pending_updates(drop_pending_updates)
        .await
        .map_err(|e| VendclaimError::Channel {
            message: format!("failed to delete webhook: {e}"),
            source: Some(Box::new(e)),
        })?;
    info!("webhook deleted");
    Ok(())
}
