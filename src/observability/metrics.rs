//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define service metrics (requests, latency, store and flag outcomes)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `visit_counter_requests_total` (counter): requests by route, outcome
//! - `visit_counter_request_duration_seconds` (histogram): latency by route
//! - `visit_counter_store_connect_attempts_total` (counter): by result
//! - `visit_counter_flag_evaluations_total` (counter): by result
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder the calls are no-ops, so tests need no setup
//! - Exporter is only installed when enabled in config

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished request.
pub fn record_request(route: &'static str, outcome: &'static str, start: Instant) {
    counter!("visit_counter_requests_total", "route" => route, "outcome" => outcome).increment(1);
    histogram!("visit_counter_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record one store connection attempt.
pub fn record_store_connect(success: bool) {
    let result = if success { "success" } else { "failure" };
    counter!("visit_counter_store_connect_attempts_total", "result" => result).increment(1);
}

/// Record a flag evaluation. `result` is one of `on`, `off`, `fallback`.
pub fn record_flag_evaluation(result: &'static str) {
    counter!("visit_counter_flag_evaluations_total", "result" => result).increment(1);
}
