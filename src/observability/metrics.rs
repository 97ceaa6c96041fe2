//! Metrics collection and exposition.
//!
//! # Metrics
//! - `content_service_requests_total` (counter): requests by endpoint, status
//! - `content_service_request_duration_seconds` (histogram): latency by endpoint
//! - `content_service_encoded_content_bytes` (gauge): size of the last content blob
//! - `content_service_encoding_failures_total` (counter): failures by error kind

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed request.
pub fn record_request(endpoint: &str, status: u16, start_time: Instant) {
    metrics::counter!(
        "content_service_requests_total",
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "content_service_request_duration_seconds",
        "endpoint" => endpoint.to_string()
    )
    .record(start_time.elapsed().as_secs_f64());
}

pub fn record_encoded_size(bytes: usize) {
    metrics::gauge!("content_service_encoded_content_bytes").set(bytes as f64);
}

pub fn record_encoding_failure(kind: &'static str) {
    metrics::counter!("content_service_encoding_failures_total", "kind" => kind).increment(1);
}

/// Middleware recording request count and latency per matched route.
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let start_time = Instant::now();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&endpoint, response.status().as_u16(), start_time);
    response
}
