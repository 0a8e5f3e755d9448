//! Liveness and readiness probes.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::db::CatalogStore;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub environment: &'static str,
}

/// `GET /health`: the process is up.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        environment: state.config().environment.as_str(),
    })
}

/// `GET /health/ready`: the store is reachable.
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let environment = state.config().environment.as_str();
    match state.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthStatus {
                status: "ready",
                environment,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus {
                    status: "unavailable",
                    environment,
                }),
            )
        }
    }
}
