//! Metrics collection and exposition.
//!
//! # Metrics
//! - `sdc_requests_total` (counter): inbound requests by method, route, status
//! - `sdc_request_duration_seconds` (histogram): inbound latency by route
//! - `sdc_upstream_requests_total` (counter): upstream calls by method, status
//! - `sdc_upstream_duration_seconds` (histogram): upstream latency

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one completed inbound request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    metrics::counter!(
        "sdc_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("sdc_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record one upstream call. `status` is the mapped gateway status on
/// transport failures.
pub fn record_upstream(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "sdc_upstream_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("sdc_upstream_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}

/// Route-level middleware feeding `record_request`.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
