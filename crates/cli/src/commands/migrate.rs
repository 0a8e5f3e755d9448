//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! catalogos-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `CATALOG_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Migrations live in `crates/api/migrations/` and are embedded in both the
//! server and this CLI through `catalogos_api::db::MIGRATOR`.

use thiserror::Error;

use catalogos_api::config::{CatalogConfig, ConfigError};
use catalogos_api::db;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Apply every pending migration.
///
/// # Errors
///
/// Returns `MigrationError` if configuration is missing, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let config = CatalogConfig::from_env()?;

    tracing::info!("Connecting to catalog database...");
    let pool = db::create_pool(&config).await?;

    let embedded = db::MIGRATOR.iter().count();
    tracing::info!(embedded, "Running catalog migrations...");
    db::run_migrations(&pool).await?;

    pool.close().await;
    tracing::info!("Catalog migrations complete!");
    Ok(())
}
