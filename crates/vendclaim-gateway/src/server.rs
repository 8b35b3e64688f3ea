// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use vendclaim_core::{ClaimRepository, VendclaimError, WebhookSink};

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Receives webhook updates. `None` in polling mode, where the webhook
    /// route is not mounted.
    pub sink: Option<Arc<dyn WebhookSink>>,
    /// Storage probed by `/ready`.
    pub storage: Arc<dyn ClaimRepository>,
    /// Expected `X-Telegram-Bot-Api-Secret-Token` header value.
    pub secret_token: Option<String>,
    /// Optional Prometheus metrics render function for `/metrics`.
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
}

/// Gateway server configuration (mirrors `[server]` from vendclaim-config).
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub webhook_path: String,
}

/// Builds the gateway router.
///
/// - `GET /` and `GET /health`: liveness
/// - `GET /ready`: storage readiness
/// - `GET /metrics`: Prometheus text
/// - `POST {webhook_path}`: Telegram updates (only when a sink is set)
pub fn router(state: GatewayState, webhook_path: &str) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::get_liveness))
        .route("/health", get(handlers::get_liveness))
        .route("/ready", get(handlers::get_ready))
        .route("/metrics", get(handlers::get_metrics));

    if state.sink.is_some() {
        app = app.route(webhook_path, post(handlers::post_webhook));
    }

    app.with_state(state).layer(TraceLayer::new_for_http())
}

/// Serves the gateway until `cancel` fires, then drains in-flight requests.
pub async fn start_server(
    config: &GatewayConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), VendclaimError> {
    let app = router(state, &config.webhook_path);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| VendclaimError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| VendclaimError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway server stopped");
    Ok(())
}
