//! Metrics collection and exposition.
//!
//! # Metrics
//! - `f5_mock_requests_total` (counter): requests by method, status
//! - `f5_mock_request_duration_seconds` (histogram): handler latency
//! - `f5_mock_store_commits_total` (counter): committed creates/patches
//! - `f5_mock_validation_failures_total` (counter): rejected candidates
//! - `f5_mock_files_written_total` (counter): virtual filesystem writes by namespace
//! - `f5_mock_tokens_issued_total` (counter): session tokens issued
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];
    ::metrics::counter!("f5_mock_requests_total", &labels).increment(1);
    ::metrics::histogram!("f5_mock_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_store_commit(operation: &'static str) {
    ::metrics::counter!("f5_mock_store_commits_total", "operation" => operation).increment(1);
}

pub fn record_validation_failure() {
    ::metrics::counter!("f5_mock_validation_failures_total").increment(1);
}

pub fn record_file_written(namespace: &'static str) {
    ::metrics::counter!("f5_mock_files_written_total", "namespace" => namespace).increment(1);
}

pub fn record_token_issued() {
    ::metrics::counter!("f5_mock_tokens_issued_total").increment(1);
}
