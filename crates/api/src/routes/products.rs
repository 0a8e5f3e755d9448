//! Product route handlers.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use catalogos_core::{ListParams, ProductId, ProductPayload};

use super::Deleted;
use crate::db::ProductStore;
use crate::error::{AppError, Result};
use crate::extract::{JsonBody, PathId, QueryParams};
use crate::models::Product;
use crate::state::AppState;

/// `POST /productos`
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ProductPayload>,
) -> Result<(StatusCode, Json<Product>)> {
    let draft = payload.into_new()?;
    let product = state.store().create_product(draft).await?;

    tracing::info!(product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// `GET /productos`
pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Vec<Product>>> {
    let page = params.into_page()?;
    Ok(Json(state.store().list_products(page).await?))
}

/// `GET /productos/{id}`
pub async fn show(
    State(state): State<AppState>,
    PathId(id): PathId<ProductId>,
) -> Result<Json<Product>> {
    state
        .store()
        .get_product(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// `PUT /productos/{id}`
#[instrument(skip_all, fields(product_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    PathId(id): PathId<ProductId>,
    JsonBody(payload): JsonBody<ProductPayload>,
) -> Result<Json<Product>> {
    let changes = payload.into_changes()?;
    Ok(Json(state.store().update_product(id, changes).await?))
}

/// `DELETE /productos/{id}`
#[instrument(skip_all, fields(product_id = %id))]
pub async fn destroy(
    State(state): State<AppState>,
    PathId(id): PathId<ProductId>,
) -> Result<Json<Deleted>> {
    state.store().delete_product(id).await?;
    Ok(Json(Deleted::new(id.as_i32())))
}
