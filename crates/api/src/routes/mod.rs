//! HTTP route handlers for the catalog.
//!
//! # Route Structure
//!
//! ```text
//! # Customers
//! POST   /clientes                  - Create customer
//! GET    /clientes                  - List customers (?skip=&limit=)
//! GET    /clientes/{id}             - Get customer
//! PUT    /clientes/{id}             - Update customer
//! DELETE /clientes/{id}             - Delete customer and its addresses
//!
//! # Addresses
//! POST   /clientes/{id}/domicilios  - Create address under customer
//! GET    /clientes/{id}/domicilios  - List addresses of customer
//! GET    /domicilios/{id}           - Get address
//! PUT    /domicilios/{id}           - Update address
//! DELETE /domicilios/{id}           - Delete address
//!
//! # Products
//! POST   /productos                 - Create product
//! GET    /productos                 - List products (?skip=&limit=)
//! GET    /productos/{id}            - Get product
//! PUT    /productos/{id}            - Update product
//! DELETE /productos/{id}            - Delete product
//!
//! # Operations
//! GET    /health                    - Liveness
//! GET    /health/ready              - Readiness (store ping)
//! GET    /metrics                   - Prometheus exposition
//! ```

pub mod addresses;
pub mod customers;
pub mod health;
pub mod products;

use axum::{Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Body returned by every successful `DELETE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Deleted {
    pub id: i32,
    pub deleted: bool,
    /// Addresses removed along with a customer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses_deleted: Option<u64>,
}

impl Deleted {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self {
            id,
            deleted: true,
            addresses_deleted: None,
        }
    }
}

/// Create the customer and address routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/clientes", get(customers::list).post(customers::create))
        .route(
            "/clientes/{id}",
            get(customers::show)
                .put(customers::update)
                .delete(customers::destroy),
        )
        .route(
            "/clientes/{id}/domicilios",
            get(addresses::list).post(addresses::create),
        )
        .route(
            "/domicilios/{id}",
            get(addresses::show)
                .put(addresses::update)
                .delete(addresses::destroy),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/productos", get(products::list).post(products::create))
        .route(
            "/productos/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create all resource routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(customer_routes())
        .merge(product_routes())
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}
