//! Data access for the catalog.
//!
//! # Database: `catalogos`
//!
//! ## Tables
//!
//! - `customers` - Customer accounts (`tax_id` unique when present)
//! - `addresses` - Postal addresses, `customer_id` references `customers`
//! - `products` - Catalog items
//!
//! # Stores
//!
//! Handlers talk to a [`CatalogStore`] trait object so the HTTP layer can run
//! against either [`PgCatalogStore`] (production) or [`MemoryCatalogStore`]
//! (tests). Both implementations honor the same rules:
//!
//! - Lists are ordered by ascending id.
//! - Creating an address under a missing customer is `NotFound` and writes nothing.
//! - Deleting a customer removes its addresses in the same transaction.
//! - A duplicate `tax_id` is a `Conflict`.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and embedded in the
//! binary. They run at startup unless `CATALOG_AUTO_MIGRATE=false`, or via:
//! ```bash
//! cargo run -p catalogos-cli -- migrate
//! ```

mod addresses;
mod customers;
mod memory;
mod products;

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use catalogos_core::{
    AddressChanges, AddressId, CustomerChanges, CustomerId, NewAddress, NewCustomer, NewProduct,
    Page, ProductChanges, ProductId,
};

use crate::config::CatalogConfig;
use crate::models::{Address, Customer, Product};

pub use memory::MemoryCatalogStore;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Constraint violation (e.g., duplicate tax id).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Customer persistence.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Insert a customer and return it with its assigned id.
    async fn create_customer(&self, draft: NewCustomer) -> Result<Customer, RepositoryError>;

    /// A window of customers ordered by id.
    async fn list_customers(&self, page: Page) -> Result<Vec<Customer>, RepositoryError>;

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;

    /// Apply a partial update in a single statement.
    async fn update_customer(
        &self,
        id: CustomerId,
        changes: CustomerChanges,
    ) -> Result<Customer, RepositoryError>;

    /// Delete a customer and all of its addresses. Returns the number of
    /// addresses removed.
    async fn delete_customer(&self, id: CustomerId) -> Result<u64, RepositoryError>;
}

/// Address persistence. Addresses are always owned by a customer.
#[async_trait]
pub trait AddressStore: Send + Sync {
    /// Insert an address under `customer_id`.
    ///
    /// Returns `NotFound` if the customer does not exist.
    async fn create_address(
        &self,
        customer_id: CustomerId,
        draft: NewAddress,
    ) -> Result<Address, RepositoryError>;

    /// All addresses of a customer ordered by id.
    ///
    /// Returns `NotFound` if the customer does not exist.
    async fn list_addresses(&self, customer_id: CustomerId)
    -> Result<Vec<Address>, RepositoryError>;

    async fn get_address(&self, id: AddressId) -> Result<Option<Address>, RepositoryError>;

    async fn update_address(
        &self,
        id: AddressId,
        changes: AddressChanges,
    ) -> Result<Address, RepositoryError>;

    async fn delete_address(&self, id: AddressId) -> Result<(), RepositoryError>;
}

/// Product persistence.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn create_product(&self, draft: NewProduct) -> Result<Product, RepositoryError>;

    /// A window of products ordered by id.
    async fn list_products(&self, page: Page) -> Result<Vec<Product>, RepositoryError>;

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    async fn update_product(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Product, RepositoryError>;

    async fn delete_product(&self, id: ProductId) -> Result<(), RepositoryError>;
}

/// Everything the HTTP layer needs from storage.
#[async_trait]
pub trait CatalogStore: CustomerStore + AddressStore + ProductStore {
    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// `PostgreSQL`-backed catalog store.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool from service configuration.
///
/// Every connection gets the configured `statement_timeout`.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be
/// established.
pub async fn create_pool(config: &CatalogConfig) -> Result<PgPool, sqlx::Error> {
    let statement_timeout_ms = config.statement_timeout.as_millis().to_string();
    let options = PgConnectOptions::from_str(config.database_url.expose_secret())?
        .options([("statement_timeout", statement_timeout_ms)]);

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.max_connections.min(2))
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Apply all pending embedded migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the recorded history
/// diverges from the embedded set.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

/// Map a write error, turning unique violations into `Conflict`.
fn map_unique_violation(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}
