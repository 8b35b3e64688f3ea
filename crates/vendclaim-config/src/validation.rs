// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::VendclaimConfig;

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &VendclaimConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if let Some(token) = &config.telegram.bot_token {
        errors.extend(check_bot_token(token));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty",
        ));
    }

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("server.host must not be empty"));
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::validation(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            )));
        }
    }

    if !config.server.webhook_path.starts_with('/') {
        errors.push(ConfigError::validation(format!(
            "server.webhook_path must start with `/`, got `{}`",
            config.server.webhook_path
        )));
    }

    if let Some(url) = &config.server.webhook_url {
        let url = url.trim();
        if url.is_empty() {
            errors.push(ConfigError::validation(
                "server.webhook_url must not be empty when set",
            ));
        } else if !(url.starts_with("https://") || url.starts_with("http://")) {
            errors.push(ConfigError::validation(format!(
                "server.webhook_url must start with https:// or http://, got `{url}`"
            )));
        }
    }

    if config.server.secret_token.as_deref().is_some_and(str::is_empty) {
        errors.push(ConfigError::validation(
            "server.secret_token must not be empty when set",
        ));
    }

    if config.dialogue.expire_after_secs == Some(0) {
        errors.push(ConfigError::validation(
            "dialogue.expire_after_secs must be greater than 0",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Structural checks on the bot token. The token itself never appears in
/// the returned messages.
fn check_bot_token(token: &str) -> Vec<ConfigError> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return vec![ConfigError::validation(
            "telegram.bot_token is empty after trimming whitespace",
        )];
    }

    let mut errors = Vec::new();
    if !trimmed.contains(':') {
        errors.push(ConfigError::validation(
            "telegram.bot_token does not contain `:`; expected `<bot id>:<secret>`",
        ));
    }
    if trimmed.chars().any(char::is_whitespace) {
        errors.push(ConfigError::validation(
            "telegram.bot_token contains whitespace",
        ));
    }
    errors
}
