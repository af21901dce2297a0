//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define request metrics (count, latency)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `mockhttp_requests_total` (counter): requests by method, status, endpoint
//! - `mockhttp_request_duration_seconds` (histogram): latency by method, endpoint
//!
//! # Design Decisions
//! - Recorded by dispatch, never by handlers
//! - Without an installed exporter the `metrics` macros are no-ops

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "mockhttp_requests_total";
pub const REQUEST_DURATION: &str = "mockhttp_request_duration_seconds";

/// Endpoint label used for requests that matched no route.
pub const UNROUTED: &str = "none";

/// Install the Prometheus exporter with its own HTTP listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Prometheus exporter listening");
    Ok(())
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, endpoint: &'static str, start: Instant) {
    metrics::counter!(
        REQUESTS_TOTAL,
        "method" => method.to_string(),
        "status" => status.to_string(),
        "endpoint" => endpoint,
    )
    .increment(1);

    metrics::histogram!(
        REQUEST_DURATION,
        "method" => method.to_string(),
        "endpoint" => endpoint,
    )
    .record(start.elapsed().as_secs_f64());
}
