// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for vendclaim.
//!
//! Serves the liveness probe the hosting platform polls, a storage
//! readiness probe, Prometheus metrics, and the endpoint Telegram posts
//! webhook updates to.

pub mod handlers;
pub mod server;

pub use server::{GatewayConfig, GatewayState, router, start_server};
