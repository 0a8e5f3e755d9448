//! Customer domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use catalogos_core::{CustomerId, Email, TaxId};

/// A customer account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    /// Server-assigned identifier.
    pub id: CustomerId,
    /// Legal name.
    pub name: String,
    /// Trading name, if different from the legal name.
    pub trade_name: Option<String>,
    /// Tax identifier (RFC), unique across customers.
    pub tax_id: Option<TaxId>,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
