//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ghproxy_requests_total` (counter): requests by method, status, outcome
//! - `ghproxy_request_duration_seconds` (histogram): time to response headers
//! - `ghproxy_redirect_hops_total` (counter): upstream fetches by status
//! - `ghproxy_size_redirects_total` (counter): payloads handed back to the client
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "ghproxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("ghproxy_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_redirect_hop(status: u16) {
    metrics::counter!("ghproxy_redirect_hops_total", "status" => status.to_string()).increment(1);
}

pub fn record_size_redirect() {
    metrics::counter!("ghproxy_size_redirects_total").increment(1);
}
