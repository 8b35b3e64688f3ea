// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared by every vendclaim crate.

use thiserror::Error;

/// The primary error type used across adapter traits and core operations.
///
/// Input validation failures are deliberately absent: they are recovered
/// locally by the dialogue controller and never leave it.
#[derive(Debug, Error)]
pub enum VendclaimError {
    /// Configuration errors (invalid TOML, missing token, bad webhook URL).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database unavailable, constraint violation).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Transport errors (message delivery, webhook registration).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VendclaimError {
    /// Returns `true` for errors raised by the storage backend.
    pub fn is_storage(&self) -> bool {
        matches!(self, VendclaimError::Storage { .. })
    }
}
