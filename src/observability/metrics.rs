//! Metrics collection and exposition.
//!
//! # Metrics
//! - `switchyard_dispatch_total` (counter): dispatched requests by verb, status
//! - `switchyard_request_duration_seconds` (histogram): dispatch latency
//! - `switchyard_unmatched_total` (counter): requests no route accepted
//! - `switchyard_routes_drawn` (gauge): concrete routes in the table
//! - `switchyard_reverse_entries` (gauge): controller actions with a reverse entry
//! - `switchyard_logins_total` (counter): login attempts by outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one dispatched request.
pub fn record_request(verb: &str, status: u16, start: Instant) {
    let status = status.to_string();
    counter!("switchyard_dispatch_total", "verb" => verb.to_string(), "status" => status.clone())
        .increment(1);
    histogram!("switchyard_request_duration_seconds", "verb" => verb.to_string(), "status" => status)
        .record(start.elapsed().as_secs_f64());
}

/// Record a request that fell through every route.
pub fn record_unmatched(verb: &str) {
    counter!("switchyard_unmatched_total", "verb" => verb.to_string()).increment(1);
}

/// Record the size of the drawn route table.
pub fn record_routes(defined: usize, entries: usize) {
    gauge!("switchyard_routes_drawn").set(defined as f64);
    gauge!("switchyard_reverse_entries").set(entries as f64);
}

/// Record a login attempt.
pub fn record_login(outcome: &'static str) {
    counter!("switchyard_logins_total", "outcome" => outcome).increment(1);
}
