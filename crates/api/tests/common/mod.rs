//! Shared helpers for HTTP-level tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use catalogos_api::config::CatalogConfig;
use catalogos_api::db::MemoryCatalogStore;
use catalogos_api::router;
use catalogos_api::state::AppState;

/// Router over an empty in-memory store.
pub fn test_router() -> Router {
    test_router_in_region("us-east-1")
}

/// Router whose metrics carry `region`, so a test can find its own series.
pub fn test_router_in_region(region: &str) -> Router {
    let mut config = CatalogConfig::local("postgres://unused");
    config.region = region.to_string();
    router(AppState::new(config, Arc::new(MemoryCatalogStore::new())))
}

/// Send a request with an optional raw body and return status plus parsed JSON.
pub async fn send_raw(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
) -> Result<(StatusCode, Value), String> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(raw) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw.to_owned())),
        None => builder.body(Body::empty()),
    }
    .map_err(|err| format!("build request: {err}"))?;

    let response = router
        .clone()
        .oneshot(request)
        .await
        .map_err(|err| format!("route request: {err}"))?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .map_err(|err| format!("read response body: {err}"))?;

    let parsed = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).map_err(|err| format!("parse response body: {err}"))?
    };
    Ok((status, parsed))
}

/// Send a request with an optional JSON body.
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> Result<(StatusCode, Value), String> {
    let raw = body.map(|value| value.to_string());
    send_raw(router, method, uri, raw.as_deref()).await
}

/// Id field of a created entity.
pub fn id_of(entity: &Value) -> Result<i64, String> {
    entity
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| format!("missing id in {entity}"))
}
