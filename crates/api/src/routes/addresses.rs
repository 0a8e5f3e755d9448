//! Address route handlers.
//!
//! Addresses are created and listed under their customer; once created they
//! are addressed by their own id.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use catalogos_core::{AddressId, AddressPayload, CustomerId};

use super::Deleted;
use crate::db::AddressStore;
use crate::error::{AppError, Result};
use crate::extract::{JsonBody, PathId};
use crate::models::Address;
use crate::state::AppState;

/// `POST /clientes/{id}/domicilios`
#[instrument(skip_all, fields(customer_id = %customer_id))]
pub async fn create(
    State(state): State<AppState>,
    PathId(customer_id): PathId<CustomerId>,
    JsonBody(payload): JsonBody<AddressPayload>,
) -> Result<(StatusCode, Json<Address>)> {
    let draft = payload.into_new()?;
    let address = state.store().create_address(customer_id, draft).await?;

    tracing::info!(address_id = %address.id, "Address created");
    Ok((StatusCode::CREATED, Json(address)))
}

/// `GET /clientes/{id}/domicilios`
pub async fn list(
    State(state): State<AppState>,
    PathId(customer_id): PathId<CustomerId>,
) -> Result<Json<Vec<Address>>> {
    Ok(Json(state.store().list_addresses(customer_id).await?))
}

/// `GET /domicilios/{id}`
pub async fn show(
    State(state): State<AppState>,
    PathId(id): PathId<AddressId>,
) -> Result<Json<Address>> {
    state
        .store()
        .get_address(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("address {id}")))
}

/// `PUT /domicilios/{id}`
#[instrument(skip_all, fields(address_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    PathId(id): PathId<AddressId>,
    JsonBody(payload): JsonBody<AddressPayload>,
) -> Result<Json<Address>> {
    let changes = payload.into_changes()?;
    Ok(Json(state.store().update_address(id, changes).await?))
}

/// `DELETE /domicilios/{id}`
#[instrument(skip_all, fields(address_id = %id))]
pub async fn destroy(
    State(state): State<AppState>,
    PathId(id): PathId<AddressId>,
) -> Result<Json<Deleted>> {
    state.store().delete_address(id).await?;
    Ok(Json(Deleted::new(id.as_i32())))
}
