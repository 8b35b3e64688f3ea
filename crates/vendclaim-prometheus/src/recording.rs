// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric descriptions and recording helpers.
//!
//! Recording goes through the `metrics` facade. Without an installed
//! recorder every helper is a no-op.

use metrics::{describe_counter, describe_histogram};

pub const EVENTS_TOTAL: &str = "vendclaim_events_total";
pub const CLAIMS_TOTAL: &str = "vendclaim_claims_total";
pub const NOTIFICATIONS_TOTAL: &str = "vendclaim_notifications_total";
pub const VALIDATION_REJECTS_TOTAL: &str = "vendclaim_validation_rejects_total";
pub const EVENT_DURATION_SECONDS: &str = "vendclaim_event_duration_seconds";

/// Register metric descriptions. Called once after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(EVENTS_TOTAL, "Inbound events handled, by kind");
    describe_counter!(CLAIMS_TOTAL, "Claim submissions, by outcome");
    describe_counter!(NOTIFICATIONS_TOTAL, "Operator notifications, by outcome");
    describe_counter!(
        VALIDATION_REJECTS_TOTAL,
        "Dialogue inputs rejected by validation, by field"
    );
    describe_histogram!(
        EVENT_DURATION_SECONDS,
        "Time spent handling one inbound event in seconds"
    );
}

/// Count an inbound event (`command`, `text`, `contact`, `callback`).
pub fn record_event(kind: &str) {
    metrics::counter!(EVENTS_TOTAL, "kind" => kind.to_string()).increment(1);
}

/// Count a claim submission (`submitted` or `storage_failed`).
pub fn record_claim(outcome: &'static str) {
    metrics::counter!(CLAIMS_TOTAL, "outcome" => outcome).increment(1);
}

/// Count an operator notification (`delivered`, `failed`, `disabled`).
pub fn record_notification(outcome: &'static str) {
    metrics::counter!(NOTIFICATIONS_TOTAL, "outcome" => outcome).increment(1);
}

/// Count a rejected dialogue input (`phone`, `amount`, `comment`).
pub fn record_validation_reject(field: &'static str) {
    metrics::counter!(VALIDATION_REJECTS_TOTAL, "field" => field).increment(1);
}

/// Record how long one event took to handle.
pub fn record_event_duration(seconds: f64) {
    metrics::histogram!(EVENT_DURATION_SECONDS).record(seconds);
}
