//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define monitor metrics (attempts, results, cycle latency, sink errors)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `uptime_probe_attempts_total` (counter): HTTP calls by url, outcome
//! - `uptime_probe_results_total` (counter): terminal results by url, outcome
//! - `uptime_endpoint_up` (gauge): 1=last result up, 0=otherwise
//! - `uptime_cycle_duration_seconds` (histogram): wall time per cycle
//! - `uptime_sink_errors_total` (counter): failed event appends

use std::net::SocketAddr;
use std::time::Instant;
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::probe::{Outcome, TerminalOutcome};

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

pub fn record_attempt(url: &str, outcome: Outcome) {
    ::metrics::counter!(
        "uptime_probe_attempts_total",
        "url" => url.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

pub fn record_result(url: &str, outcome: TerminalOutcome) {
    ::metrics::counter!(
        "uptime_probe_results_total",
        "url" => url.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);

    let up = if outcome.is_up() { 1.0 } else { 0.0 };
    ::metrics::gauge!("uptime_endpoint_up", "url" => url.to_string()).set(up);
}

pub fn record_cycle(start: Instant) {
    ::metrics::histogram!("uptime_cycle_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_sink_error() {
    ::metrics::counter!("uptime_sink_errors_total").increment(1);
}
