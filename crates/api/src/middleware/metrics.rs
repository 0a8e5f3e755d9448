//! Request-lifecycle metrics.

use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, histogram};

use crate::metrics::{
    REQUEST_DURATION, REQUESTS_TOTAL, UNMATCHED_ENDPOINT, record_application_error, status_class,
};

/// Deployment labels attached to every request metric.
#[derive(Debug, Clone)]
pub struct MetricsLabels {
    pub environment: String,
    pub region: String,
}

/// Response extension naming the kind of server-side failure behind a 5xx.
///
/// Inserted by `AppError` and the panic handler; read back here to label
/// `catalog_application_errors_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorKind(pub &'static str);

pub(crate) fn endpoint_label<B>(request: &Request<B>) -> String {
    request.extensions().get::<MatchedPath>().map_or_else(
        || UNMATCHED_ENDPOINT.to_string(),
        |path| path.as_str().to_string(),
    )
}

/// Middleware that records one latency observation and one counter increment
/// per request, whatever the outcome.
///
/// Must be installed with `Router::layer` so the matched route template is
/// already in the request extensions, and outside the timeout and panic
/// layers so their responses are counted too.
pub async fn track_request(
    State(labels): State<MetricsLabels>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let endpoint = endpoint_label(&request);
    let method = request.method().to_string();

    let response = next.run(request).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status();
    let class = status_class(status);

    let metric_labels = [
        ("endpoint", endpoint.clone()),
        ("method", method.clone()),
        ("status_class", class.to_string()),
        ("environment", labels.environment.clone()),
        ("region", labels.region.clone()),
    ];
    histogram!(REQUEST_DURATION, &metric_labels).record(duration);
    counter!(REQUESTS_TOTAL, &metric_labels).increment(1);

    if status.is_server_error() {
        let kind = response
            .extensions()
            .get::<ErrorKind>()
            .map_or("unknown", |kind| kind.0);
        record_application_error(kind, &labels.environment);
    }

    if duration > 1.0 {
        tracing::warn!(
            endpoint = %endpoint,
            method = %method,
            status = %status.as_u16(),
            duration_secs = %duration,
            "Slow request detected"
        );
    }

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;
    use crate::metrics::{APPLICATION_ERRORS, init_metrics};

    fn labels(region: &str) -> MetricsLabels {
        MetricsLabels {
            environment: "local".to_string(),
            region: region.to_string(),
        }
    }

    #[test]
    fn test_endpoint_label_unmatched() {
        let request = Request::builder()
            .uri("/missing")
            .body(Body::empty())
            .unwrap();
        assert_eq!(endpoint_label(&request), UNMATCHED_ENDPOINT);
    }

    #[tokio::test]
    async fn test_route_template_is_used() {
        let handle = init_metrics();
        let app = Router::new()
            .route("/items/{id}", get(|| async { StatusCode::OK }))
            .layer(axum::middleware::from_fn_with_state(
                labels("mw-template"),
                track_request,
            ));

        let request = Request::builder()
            .uri("/items/123")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let rendered = handle.render();
        let line = rendered
            .lines()
            .find(|line| line.starts_with(REQUESTS_TOTAL) && line.contains("mw-template"))
            .unwrap();
        assert!(line.contains("endpoint=\"/items/{id}\""));
        assert!(line.contains("status_class=\"2xx\""));
        assert!(!rendered.contains("endpoint=\"/items/123\""));
    }

    #[tokio::test]
    async fn test_server_error_kind_is_counted() {
        let handle = init_metrics();
        let app = Router::new()
            .route(
                "/boom",
                get(|| async {
                    let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
                    response.extensions_mut().insert(ErrorKind("mw_kind_test"));
                    response
                }),
            )
            .layer(axum::middleware::from_fn_with_state(
                labels("mw-errors"),
                track_request,
            ));

        let request = Request::builder().uri("/boom").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let rendered = handle.render();
        assert!(rendered.lines().any(|line| {
            line.starts_with(APPLICATION_ERRORS) && line.contains("error_type=\"mw_kind_test\"")
        }));
    }
}
