//! Seed the catalog from a YAML file.
//!
//! Every record goes through the same validation as the HTTP API. The whole
//! file is validated before the database is touched; any invalid record aborts
//! the run.
//!
//! ```yaml
//! customers:
//!   - name: Ana
//!     tax_id: XAXX010101000
//!     addresses:
//!       - street: Calle Test 123
//!         postal_code: "44100"
//!         kind: FACTURACION
//! products:
//!   - name: Widget
//!     unit: PZA
//!     price: 9.99
//!     stock: 10
//! ```
//!
//! Customers whose `tax_id` already exists are skipped together with their
//! addresses. Products have no natural key, so seeding the same file twice
//! duplicates them.

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info, warn};

use catalogos_api::config::CatalogConfig;
use catalogos_api::db::{
    self, AddressStore, CustomerStore, PgCatalogStore, ProductStore, RepositoryError,
};
use catalogos_core::{
    AddressPayload, CustomerPayload, FieldError, NewAddress, NewCustomer, NewProduct,
    ProductPayload,
};

/// Top-level seed document.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedFile {
    #[serde(default)]
    pub customers: Vec<SeedCustomer>,
    #[serde(default)]
    pub products: Vec<ProductPayload>,
}

/// A customer with its addresses inline.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedCustomer {
    pub name: Option<String>,
    pub trade_name: Option<String>,
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub addresses: Vec<AddressPayload>,
}

impl SeedCustomer {
    fn split(self) -> (CustomerPayload, Vec<AddressPayload>) {
        let payload = CustomerPayload {
            name: self.name,
            trade_name: self.trade_name,
            tax_id: self.tax_id,
            email: self.email,
            phone: self.phone,
        };
        (payload, self.addresses)
    }
}

/// A seed file that passed validation.
#[derive(Debug, Default)]
pub struct ValidatedSeed {
    pub customers: Vec<(NewCustomer, Vec<NewAddress>)>,
    pub products: Vec<NewProduct>,
}

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub customers_inserted: usize,
    pub customers_skipped: usize,
    pub addresses_inserted: usize,
    pub products_inserted: usize,
}

/// Validate every record, collecting all field errors with their position,
/// e.g. `customers[0].addresses[1].street`.
///
/// # Errors
///
/// Returns every field error found in the file.
pub fn validate(file: SeedFile) -> Result<ValidatedSeed, Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut seed = ValidatedSeed::default();

    for (i, customer) in file.customers.into_iter().enumerate() {
        let prefix = format!("customers[{i}]");
        let (payload, addresses) = customer.split();

        let mut drafts = Vec::with_capacity(addresses.len());
        for (j, address) in addresses.into_iter().enumerate() {
            match address.into_new() {
                Ok(draft) => drafts.push(draft),
                Err(e) => errors.extend(
                    e.prefixed(&format!("{prefix}.addresses[{j}]"))
                        .errors()
                        .iter()
                        .cloned(),
                ),
            }
        }

        match payload.into_new() {
            Ok(draft) => seed.customers.push((draft, drafts)),
            Err(e) => errors.extend(e.prefixed(&prefix).errors().iter().cloned()),
        }
    }

    for (i, product) in file.products.into_iter().enumerate() {
        match product.into_new() {
            Ok(draft) => seed.products.push(draft),
            Err(e) => errors.extend(
                e.prefixed(&format!("products[{i}]"))
                    .errors()
                    .iter()
                    .cloned(),
            ),
        }
    }

    if errors.is_empty() {
        Ok(seed)
    } else {
        Err(errors)
    }
}

/// Write a validated seed through any catalog store.
///
/// # Errors
///
/// Returns the first storage error other than a duplicate customer.
pub async fn apply<S>(store: &S, seed: ValidatedSeed) -> Result<SeedSummary, RepositoryError>
where
    S: CustomerStore + AddressStore + ProductStore + ?Sized,
{
    let mut summary = SeedSummary::default();

    for (draft, addresses) in seed.customers {
        let name = draft.name.clone();
        let customer = match store.create_customer(draft).await {
            Ok(customer) => customer,
            Err(RepositoryError::Conflict(reason)) => {
                warn!(customer = %name, %reason, "Skipping existing customer");
                summary.customers_skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };
        summary.customers_inserted += 1;

        for address in addresses {
            store.create_address(customer.id, address).await?;
            summary.addresses_inserted += 1;
        }
    }

    for draft in seed.products {
        store.create_product(draft).await?;
        summary.products_inserted += 1;
    }

    Ok(summary)
}

/// Seed the catalog database from `file_path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, any record is
/// invalid, or a database operation fails.
pub async fn run(file_path: &Path, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !file_path.exists() {
        return Err(format!("File not found: {}", file_path.display()).into());
    }

    info!(path = %file_path.display(), "Loading seed file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(file_path).await?;
    let file: SeedFile = serde_yaml::from_str(&content)?;
    info!(
        customers = file.customers.len(),
        products = file.products.len(),
        "Parsed seed file"
    );

    let seed = match validate(file) {
        Ok(seed) => seed,
        Err(errors) => {
            error!("Seed file validation failed:");
            for err in &errors {
                error!("  - {} {}", err.field, err.message);
            }
            return Err(format!("{} validation errors found", errors.len()).into());
        }
    };
    info!("Seed file validated successfully");

    if dry_run {
        info!("Dry run, nothing written");
        return Ok(());
    }

    let config = CatalogConfig::from_env()?;
    let pool = db::create_pool(&config).await?;
    info!("Connected to database");

    let store = PgCatalogStore::new(pool.clone());
    let summary = apply(&store, seed).await?;
    pool.close().await;

    info!("Seeding complete!");
    info!("  Customers inserted: {}", summary.customers_inserted);
    info!("  Customers skipped (tax_id exists): {}", summary.customers_skipped);
    info!("  Addresses inserted: {}", summary.addresses_inserted);
    info!("  Products inserted: {}", summary.products_inserted);

    Ok(())
}
