//! Prometheus metrics for the catalog service.
//!
//! Every request is recorded by [`crate::middleware::metrics::track_request`]:
//! - `catalog_request_duration_seconds{endpoint, method, status_class, environment, region}`
//! - `catalog_requests_total{endpoint, method, status_class, environment, region}`
//!
//! Server-side failures also bump
//! `catalog_application_errors_total{error_type, environment}`.
//!
//! The `metrics` macros are no-ops until a recorder is installed, so recording
//! can never fail a request.

use std::sync::OnceLock;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use metrics::{counter, describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

// ============================================================================
// Metric Names
// ============================================================================

/// Request latency histogram.
pub const REQUEST_DURATION: &str = "catalog_request_duration_seconds";

/// Request counter, one increment per response.
pub const REQUESTS_TOTAL: &str = "catalog_requests_total";

/// Server-side failure counter.
pub const APPLICATION_ERRORS: &str = "catalog_application_errors_total";

/// Endpoint label for requests that matched no route.
pub const UNMATCHED_ENDPOINT: &str = "unmatched";

// ============================================================================
// Prometheus Recorder
// ============================================================================

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initializes the global metrics recorder with the Prometheus exporter.
///
/// Safe to call multiple times; subsequent calls return the same handle.
///
/// # Panics
///
/// Panics if another global recorder was already installed by a different
/// component. The service should not start with metrics going nowhere.
#[allow(clippy::panic)]
pub fn init_metrics() -> PrometheusHandle {
    PROMETHEUS_HANDLE
        .get_or_init(|| {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .unwrap_or_else(|e| panic!("failed to install prometheus recorder: {e}"));

            describe_histogram!(REQUEST_DURATION, "Duration of catalog requests in seconds");
            describe_counter!(REQUESTS_TOTAL, "Total number of catalog requests");
            describe_counter!(
                APPLICATION_ERRORS,
                "Total number of requests that failed on the server side"
            );

            tracing::info!("Prometheus metrics recorder initialized");
            handle
        })
        .clone()
}

/// Returns the global Prometheus handle, if initialized.
#[must_use]
pub fn prometheus_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned()
}

/// Returns the status class (2xx, 3xx, 4xx, 5xx) for a status code.
#[must_use]
pub fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "unknown",
    }
}

/// Records one server-side failure.
pub fn record_application_error(error_type: &str, environment: &str) {
    counter!(
        APPLICATION_ERRORS,
        "error_type" => error_type.to_string(),
        "environment" => environment.to_string()
    )
    .increment(1);
}

// ============================================================================
// Metrics Endpoint
// ============================================================================

/// Handler for `GET /metrics`.
///
/// Returns Prometheus-formatted metrics text.
pub async fn serve_metrics() -> impl IntoResponse {
    prometheus_handle().map_or_else(
        || {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [("content-type", "text/plain; charset=utf-8")],
                "Metrics not initialized".to_string(),
            )
        },
        |handle| {
            (
                StatusCode::OK,
                [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
                handle.render(),
            )
        },
    )
}
