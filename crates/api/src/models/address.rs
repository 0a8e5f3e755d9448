//! Address domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use catalogos_core::{AddressId, AddressKind, CustomerId};

/// A postal address owned by exactly one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    pub id: AddressId,
    /// Owning customer. Fixed at creation.
    pub customer_id: CustomerId,
    pub street: String,
    pub neighborhood: Option<String>,
    pub locality: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub kind: Option<AddressKind>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
