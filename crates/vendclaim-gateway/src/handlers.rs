// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use vendclaim_core::HealthStatus;

use crate::server::GatewayState;

/// Header Telegram uses to echo the webhook secret token.
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Response body for GET /ready.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// "ready" or "unavailable".
    pub status: String,
    /// Storage health as reported by its health check.
    pub storage: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// GET / and GET /health
///
/// Liveness only; dependencies are not probed.
pub async fn get_liveness() -> &'static str {
    "ok"
}

/// GET /ready
pub async fn get_ready(State(state): State<GatewayState>) -> Response {
    let (ready, storage) = match state.storage.health_check().await {
        Ok(HealthStatus::Healthy) => (true, "healthy".to_string()),
        Ok(HealthStatus::Degraded(reason)) => (true, format!("degraded: {reason}")),
        Ok(HealthStatus::Unhealthy(reason)) => (false, format!("unhealthy: {reason}")),
        Err(e) => (false, format!("error: {e}")),
    };

    let body = ReadyResponse {
        status: if ready { "ready" } else { "unavailable" }.to_string(),
        storage,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    };
    let code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(body)).into_response()
}

/// GET /metrics
///
/// Prometheus text format, or 404 when the exporter is disabled.
pub async fn get_metrics(State(state): State<GatewayState>) -> Response {
    match &state.prometheus_render {
        Some(render) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}

/// POST {webhook_path}
///
/// Processing failures are logged and still answered `200 ok` so Telegram
/// does not redeliver the update.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(expected) = &state.secret_token {
        let provided = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());
        if provided != Some(expected.as_str()) {
            tracing::warn!("webhook request with missing or wrong secret token");
            return (StatusCode::UNAUTHORIZED, "unauthorized").into_response();
        }
    }

    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "webhook body is not valid JSON");
            return (StatusCode::BAD_REQUEST, "bad request").into_response();
        }
    };

    let Some(sink) = &state.sink else {
        return (StatusCode::NOT_FOUND, "webhook disabled").into_response();
    };
    if let Err(e) = sink.deliver(payload).await {
        tracing::error!(error = %e, "failed to process webhook update");
    }

    (StatusCode::OK, "ok").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_response_serializes() {
        let resp = ReadyResponse {
            status: "ready".to_string(),
            storage: "healthy".to_string(),
            version: "0.1.0".to_string(),
            uptime_secs: 42,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ready\""));
        assert!(json.contains("\"storage\":\"healthy\""));
        assert!(json.contains("\"uptime_secs\":42"));
    }

    #[tokio::test]
    async fn liveness_is_plain_ok() {
        assert_eq!(get_liveness().await, "ok");
    }
}
