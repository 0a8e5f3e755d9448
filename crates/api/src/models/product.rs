//! Product domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use catalogos_core::{Price, ProductId};

/// A sellable catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit of measure, e.g. `PZA` or `KG`.
    pub unit: Option<String>,
    /// Base price, never negative.
    pub price: Price,
    /// Units on hand, never negative.
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
