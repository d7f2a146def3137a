//! Request metrics.

use anyhow::{Context, Result};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the global Prometheus recorder.
pub fn install_recorder() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")
}

/// Record an inbound request.
pub fn record_request(endpoint: &'static str) {
    counter!("rides_requests_total", "endpoint" => endpoint).increment(1);
}

/// Record a failed request.
pub fn record_error(endpoint: &'static str, kind: &'static str) {
    counter!("rides_request_errors_total", "endpoint" => endpoint, "kind" => kind).increment(1);
}

/// Record the time spent in the store for one query.
pub fn record_query_duration(endpoint: &'static str, elapsed: Duration) {
    histogram!("rides_query_duration_ms", "endpoint" => endpoint)
        .record(elapsed.as_secs_f64() * 1000.0);
}
