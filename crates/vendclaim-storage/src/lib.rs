// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for claims.
//!
//! WAL-mode SQLite with embedded migrations. Every statement runs on the
//! single background thread owned by `tokio-rusqlite`, which serializes
//! writes and keeps claim ids strictly increasing.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use adapter::SqliteClaimStore;
pub use database::Database;
pub use models::*;
