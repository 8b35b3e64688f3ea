// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key fails
//! startup instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level vendclaim configuration.
///
/// Every section is optional and falls back to its defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VendclaimConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram transport and operator settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Claim database settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP listener and webhook settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Dialogue behavior.
    #[serde(default)]
    pub dialogue: DialogueConfig,

    /// Prometheus exporter.
    #[serde(default)]
    pub prometheus: PrometheusConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Name used in logs and the `/ready` payload.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "vendclaim".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required by `serve` and `poll`.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Chat that receives new-claim notifications. `None` disables them.
    #[serde(default)]
    pub operator_chat_id: Option<i64>,

    /// Telegram user ids or usernames allowed to talk to the bot.
    /// Empty means everyone.
    #[serde(default)]
    pub allowed_users: Vec<String>,

    /// Ignore messages from group chats.
    #[serde(default = "default_private_only")]
    pub private_only: bool,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            operator_chat_id: None,
            allowed_users: Vec::new(),
            private_only: default_private_only(),
        }
    }
}

fn default_private_only() -> bool {
    true
}

/// SQLite storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the claims database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL journaling.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("vendclaim").join("vendclaim.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("vendclaim.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// HTTP listener and webhook configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP listener binds to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path that receives webhook updates.
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,

    /// Public URL Telegram pushes updates to. A bare origin such as
    /// `https://bot.example.com` gets `webhook_path` appended. Required by `serve`.
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Secret echoed by Telegram in `X-Telegram-Bot-Api-Secret-Token`.
    #[serde(default)]
    pub secret_token: Option<String>,

    /// Discard updates queued while the bot was offline.
    #[serde(default = "default_drop_pending_updates")]
    pub drop_pending_updates: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            webhook_path: default_webhook_path(),
            webhook_url: None,
            secret_token: None,
            drop_pending_updates: default_drop_pending_updates(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    10000
}

fn default_webhook_path() -> String {
    "/telegram".to_string()
}

fn default_drop_pending_updates() -> bool {
    true
}

/// Dialogue behavior configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DialogueConfig {
    /// Reset an unfinished dialogue to idle when it has been untouched for
    /// this many seconds. `None` keeps dialogues forever.
    #[serde(default)]
    pub expire_after_secs: Option<u64>,
}

/// Prometheus exporter configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PrometheusConfig {
    /// Install the exporter and serve `GET /metrics`.
    #[serde(default)]
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = VendclaimConfig::default();
        assert_eq!(config.bot.name, "vendclaim");
        assert_eq!(config.bot.log_level, "info");
        assert!(config.telegram.bot_token.is_none());
        assert!(config.telegram.operator_chat_id.is_none());
        assert!(config.telegram.private_only);
        assert!(config.storage.wal_mode);
        assert!(config.storage.database_path.ends_with("vendclaim.db"));
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 10000);
        assert_eq!(config.server.webhook_path, "/telegram");
        assert!(config.server.drop_pending_updates);
        assert!(config.dialogue.expire_after_secs.is_none());
        assert!(!config.prometheus.enabled);
    }

    #[test]
    fn server_section_rejects_unknown_keys() {
        let toml_str = r#"
[server]
prot = 8080
"#;
        assert!(toml::from_str::<VendclaimConfig>(toml_str).is_err());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let toml_str = r#"
[server]
port = 8443
"#;
        let config: VendclaimConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 8443);
        assert_eq!(config.server.webhook_path, "/telegram");
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
