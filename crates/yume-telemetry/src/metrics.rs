//! Prometheus metrics for the presence bridge.
//!
//! Metric registration uses `unwrap()`: a failure means duplicate metric
//! names, which is a programming error caught on first use.

use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, Encoder, IntCounter,
    IntCounterVec, IntGauge, TextEncoder,
};

use crate::error::{TelemetryError, TelemetryResult};

/// Social client connection state (1 = connected).
pub static CLIENT_CONNECTED: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "yume_rp_client_connected",
        "Presence client connection state (1=connected)"
    )
    .unwrap()
});

/// Connection attempts by result.
pub static CONNECT_ATTEMPTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "yume_rp_connect_attempts_total",
        "Presence client connection attempts",
        &["result"]
    )
    .unwrap()
});

/// Presence payloads pushed to the client.
pub static PRESENCE_PUSHED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "yume_rp_presence_pushed_total",
        "Presence payloads pushed to the client"
    )
    .unwrap()
});

/// Cycles where the payload was unchanged and the push was skipped.
pub static PRESENCE_SUPPRESSED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "yume_rp_presence_suppressed_total",
        "Update cycles skipped because the payload was unchanged"
    )
    .unwrap()
});

/// Failed pushes.
pub static PUSH_FAILED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "yume_rp_push_failed_total",
        "Presence pushes that failed"
    )
    .unwrap()
});

/// Ingestion requests by outcome.
pub static INGEST_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "yume_rp_ingest_total",
        "Game state ingestion requests",
        &["outcome"]
    )
    .unwrap()
});

/// Room image lookups by outcome (hit/cached/miss/timeout).
pub static IMAGE_LOOKUP_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "yume_rp_image_lookup_total",
        "Room image lookups",
        &["outcome"]
    )
    .unwrap()
});

/// Metrics facade.
pub struct Metrics;

impl Metrics {
    /// Record the client as connected.
    pub fn client_connected() {
        CLIENT_CONNECTED.set(1);
    }

    /// Record the client as disconnected.
    pub fn client_disconnected() {
        CLIENT_CONNECTED.set(0);
    }

    /// Record a connection attempt ("ok" or "failed").
    pub fn connect_attempt(result: &str) {
        CONNECT_ATTEMPTS_TOTAL.with_label_values(&[result]).inc();
    }

    /// Record a pushed payload.
    pub fn presence_pushed() {
        PRESENCE_PUSHED_TOTAL.inc();
    }

    /// Record a suppressed push.
    pub fn presence_suppressed() {
        PRESENCE_SUPPRESSED_TOTAL.inc();
    }

    /// Record a failed push.
    pub fn push_failed() {
        PUSH_FAILED_TOTAL.inc();
    }

    /// Record an ingestion request ("accepted" or "rejected").
    pub fn ingest(outcome: &str) {
        INGEST_TOTAL.with_label_values(&[outcome]).inc();
    }

    /// Record an image lookup outcome.
    pub fn image_lookup(outcome: &str) {
        IMAGE_LOOKUP_TOTAL.with_label_values(&[outcome]).inc();
    }

    /// Render all registered metrics in the Prometheus text format.
    pub fn render() -> TelemetryResult<String> {
        let families = prometheus::gather();
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&families, &mut buffer)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_show_up_in_render() {
        Metrics::presence_pushed();
        Metrics::ingest("accepted");
        Metrics::client_connected();

        let text = Metrics::render().unwrap();
        assert!(text.contains("yume_rp_presence_pushed_total"));
        assert!(text.contains("yume_rp_ingest_total{outcome=\"accepted\"}"));
        assert!(text.contains("yume_rp_client_connected 1"));
    }
}
