// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `./vendclaim.toml` > `~/.config/vendclaim/vendclaim.toml` >
//! `/etc/vendclaim/vendclaim.toml`, overridden by `VENDCLAIM_*` variables and
//! finally by the bare variables hosting platforms set (`BOT_TOKEN`, `PORT`,
//! `WEBHOOK_URL`, `OPERATOR_CHAT_ID`).

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::VendclaimConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/vendclaim/vendclaim.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "vendclaim.toml";

/// Bare environment variables and the keys they populate.
const PLATFORM_ENV: &[(&str, &str)] = &[
    ("BOT_TOKEN", "telegram.bot_token"),
    ("PORT", "server.port"),
    ("WEBHOOK_URL", "server.webhook_url"),
    ("OPERATOR_CHAT_ID", "telegram.operator_chat_id"),
];

/// Path of the per-user configuration file, if a config dir exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("vendclaim").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/vendclaim/vendclaim.toml`
/// 3. `~/.config/vendclaim/vendclaim.toml`
/// 4. `./vendclaim.toml`
/// 5. `VENDCLAIM_*` environment variables
/// 6. `BOT_TOKEN`, `PORT`, `WEBHOOK_URL`, `OPERATOR_CHAT_ID`
pub fn load_config() -> Result<VendclaimConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<VendclaimConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VendclaimConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file, still honoring env overrides.
pub fn load_config_from_path(path: &Path) -> Result<VendclaimConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VendclaimConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .merge(platform_env_provider())
        .extract()
}

/// The Figment used by [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(VendclaimConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
        .merge(platform_env_provider())
}

/// `VENDCLAIM_*` provider.
///
/// Maps the section prefix explicitly instead of splitting on `_`, so
/// `VENDCLAIM_TELEGRAM_BOT_TOKEN` becomes `telegram.bot_token` rather than
/// `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("VENDCLAIM_").map(|key| {
        let key_str = key.as_str();
        let mapped = ["bot", "telegram", "storage", "server", "dialogue", "prometheus"]
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or_else(|| key_str.to_string());
        mapped.into()
    })
}

/// Provider for the unprefixed variables set by hosting platforms.
fn platform_env_provider() -> Env {
    let names: Vec<&str> = PLATFORM_ENV.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        PLATFORM_ENV
            .iter()
            .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            .map(|(_, target)| (*target).into())
            .unwrap_or_else(|| key.as_str().to_string().into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_env_maps_sections_explicitly() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("VENDCLAIM_TELEGRAM_BOT_TOKEN", "1:abc");
            jail.set_env("VENDCLAIM_SERVER_WEBHOOK_PATH", "/hook");
            jail.set_env("VENDCLAIM_DIALOGUE_EXPIRE_AFTER_SECS", "600");

            let config: VendclaimConfig = Figment::new()
                .merge(Serialized::defaults(VendclaimConfig::default()))
                .merge(env_provider())
                .extract()?;

            assert_eq!(config.telegram.bot_token.as_deref(), Some("1:abc"));
            assert_eq!(config.server.webhook_path, "/hook");
            assert_eq!(config.dialogue.expire_after_secs, Some(600));
            Ok(())
        });
    }

    #[test]
    fn platform_env_overrides_prefixed_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("VENDCLAIM_SERVER_PORT", "8080");
            jail.set_env("PORT", "9090");
            jail.set_env("BOT_TOKEN", "42:token");
            jail.set_env("WEBHOOK_URL", "https://bot.example.com");
            jail.set_env("OPERATOR_CHAT_ID", "-100200");

            let config = load_config()?;

            assert_eq!(config.server.port, 9090);
            assert_eq!(config.telegram.bot_token.as_deref(), Some("42:token"));
            assert_eq!(
                config.server.webhook_url.as_deref(),
                Some("https://bot.example.com")
            );
            assert_eq!(config.telegram.operator_chat_id, Some(-100200));
            Ok(())
        });
    }

    #[test]
    fn local_file_is_picked_up() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                LOCAL_CONFIG_FILE,
                r#"
[bot]
log_level = "debug"
"#,
            )?;
            let config = load_config()?;
            assert_eq!(config.bot.log_level, "debug");
            Ok(())
        });
    }
}
