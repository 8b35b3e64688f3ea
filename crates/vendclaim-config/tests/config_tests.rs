// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the configuration system.

use std::io::Write;

use vendclaim_config::diagnostic::ConfigError;
use vendclaim_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// A file using every section deserializes into the expected values.
#[test]
fn full_toml_deserializes() {
    let toml = r#"
[bot]
name = "kiosk-7"
log_level = "debug"

[telegram]
bot_token = "123:ABC"
operator_chat_id = -1001234
allowed_users = ["alice", "42"]
private_only = false

[storage]
database_path = "/tmp/claims.db"
wal_mode = false

[server]
host = "127.0.0.1"
port = 8080
webhook_path = "/hook"
webhook_url = "https://bot.example.com"
secret_token = "s3cret"
drop_pending_updates = false

[dialogue]
expire_after_secs = 900

[prometheus]
enabled = true
"#;

    let config = load_and_validate_str(toml).expect("valid config");
    assert_eq!(config.bot.name, "kiosk-7");
    assert_eq!(config.bot.log_level, "debug");
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:ABC"));
    assert_eq!(config.telegram.operator_chat_id, Some(-1001234));
    assert_eq!(config.telegram.allowed_users, vec!["alice", "42"]);
    assert!(!config.telegram.private_only);
    assert_eq!(config.storage.database_path, "/tmp/claims.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.webhook_path, "/hook");
    assert_eq!(
        config.server.webhook_url.as_deref(),
        Some("https://bot.example.com")
    );
    assert_eq!(config.server.secret_token.as_deref(), Some("s3cret"));
    assert!(!config.server.drop_pending_updates);
    assert_eq!(config.dialogue.expire_after_secs, Some(900));
    assert!(config.prometheus.enabled);
}

/// An empty file yields the documented defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.bot.name, "vendclaim");
    assert_eq!(config.server.port, 10000);
    assert_eq!(config.server.webhook_path, "/telegram");
    assert!(config.telegram.operator_chat_id.is_none());
}

/// Unknown keys surface as `UnknownKey` with a suggestion.
#[test]
fn unknown_key_gets_suggestion() {
    let toml = r#"
[telegram]
bot_tken = "1:a"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown key");
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key, suggestion, ..
            } => Some((key.clone(), suggestion.clone())),
            _ => None,
        })
        .expect("should produce UnknownKey");
    assert_eq!(unknown.0, "bot_tken");
    assert_eq!(unknown.1.as_deref(), Some("bot_token"));
}

/// Unknown top-level sections are rejected too.
#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[servr]\nport = 1\n").expect_err("should reject");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::UnknownKey { key, .. } if key == "servr"))
    );
}

/// A wrongly typed value becomes `InvalidType`.
#[test]
fn wrong_type_is_reported() {
    let errors =
        load_and_validate_str("[server]\nport = \"eighty\"\n").expect_err("should reject");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("port")))
    );
}

/// Semantic failures come back as `Validation` errors.
#[test]
fn validation_runs_after_deserialization() {
    let toml = r#"
[telegram]
bot_token = "no-colon-here"

[server]
webhook_path = "telegram"
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 2);
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}

/// An explicit config path is read and validated.
#[test]
fn explicit_path_is_loaded() {
    let mut file = tempfile::NamedTempFile::new().expect("create temp config");
    writeln!(file, "[bot]\nname = \"from-file\"").expect("write config");

    let config = load_and_validate_path(file.path()).expect("valid config");
    assert_eq!(config.bot.name, "from-file");
}
