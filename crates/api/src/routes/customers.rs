//! Customer route handlers.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use catalogos_core::{CustomerId, CustomerPayload, ListParams};

use super::Deleted;
use crate::db::CustomerStore;
use crate::error::{AppError, Result};
use crate::extract::{JsonBody, PathId, QueryParams};
use crate::models::Customer;
use crate::state::AppState;

/// `POST /clientes`
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CustomerPayload>,
) -> Result<(StatusCode, Json<Customer>)> {
    let draft = payload.into_new()?;
    let customer = state.store().create_customer(draft).await?;

    tracing::info!(customer_id = %customer.id, "Customer created");
    Ok((StatusCode::CREATED, Json(customer)))
}

/// `GET /clientes`
pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Vec<Customer>>> {
    let page = params.into_page()?;
    Ok(Json(state.store().list_customers(page).await?))
}

/// `GET /clientes/{id}`
pub async fn show(
    State(state): State<AppState>,
    PathId(id): PathId<CustomerId>,
) -> Result<Json<Customer>> {
    state
        .store()
        .get_customer(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))
}

/// `PUT /clientes/{id}`
#[instrument(skip_all, fields(customer_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    PathId(id): PathId<CustomerId>,
    JsonBody(payload): JsonBody<CustomerPayload>,
) -> Result<Json<Customer>> {
    let changes = payload.into_changes()?;
    let customer = state.store().update_customer(id, changes).await?;
    Ok(Json(customer))
}

/// `DELETE /clientes/{id}`
///
/// Removes the customer together with all of its addresses.
#[instrument(skip_all, fields(customer_id = %id))]
pub async fn destroy(
    State(state): State<AppState>,
    PathId(id): PathId<CustomerId>,
) -> Result<Json<Deleted>> {
    let removed = state.store().delete_customer(id).await?;

    tracing::info!(addresses_deleted = removed, "Customer deleted");
    Ok(Json(Deleted {
        addresses_deleted: Some(removed),
        ..Deleted::new(id.as_i32())
    }))
}
