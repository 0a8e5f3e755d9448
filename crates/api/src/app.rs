//! Router assembly.
//!
//! Layer order, outermost first:
//!
//! 1. `TraceLayer` span per request
//! 2. Request id
//! 3. Metrics (sees every response, including the three below)
//! 4. CORS (permissive; answers preflights itself)
//! 5. Request timeout (`408`)
//! 6. Panic catcher (`500`)

use std::any::Any;

use axum::{
    Router,
    http::{Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::error::AppError;
use crate::metrics::serve_metrics;
use crate::middleware::{ErrorKind, MetricsLabels, request_id_middleware, track_request};
use crate::routes;
use crate::state::AppState;

/// Build the complete HTTP application.
pub fn router(state: AppState) -> Router {
    let config = state.config();
    let labels = MetricsLabels {
        environment: config.environment.as_str().to_string(),
        region: config.region.clone(),
    };
    let request_timeout = config.request_timeout;

    Router::new()
        .merge(routes::routes())
        .route("/metrics", get(serve_metrics))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn_with_state(labels, track_request))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("route".to_string())
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %message, "Handler panicked");

    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(serde_json::json!({ "detail": "Internal server error" })),
    )
        .into_response();
    response.extensions_mut().insert(ErrorKind("panic"));
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use tower::ServiceExt;

    use super::*;
    use crate::config::CatalogConfig;
    use crate::db::MemoryCatalogStore;

    fn app() -> Router {
        let state = AppState::new(
            CatalogConfig::local("postgres://unused"),
            Arc::new(MemoryCatalogStore::new()),
        );
        router(state)
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let request = Request::builder()
            .uri("/nowhere")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_health_reports_environment() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["environment"], "local");
    }

    #[test]
    fn test_panic_response() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.extensions().get::<ErrorKind>(),
            Some(&ErrorKind("panic"))
        );
    }
}
