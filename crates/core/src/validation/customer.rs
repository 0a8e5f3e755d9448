//! Customer payload rules.

use serde::{Deserialize, Serialize};

use super::{ValidationErrors, Validator, parse_phone};
use crate::{Email, TaxId};

const NAME_MAX: usize = 255;

/// JSON body accepted by `POST /clientes` and `PUT /clientes/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomerPayload {
    pub name: Option<String>,
    pub trade_name: Option<String>,
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A validated customer ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub trade_name: Option<String>,
    pub tax_id: Option<TaxId>,
    pub email: Option<Email>,
    pub phone: Option<String>,
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerChanges {
    pub name: Option<String>,
    pub trade_name: Option<String>,
    pub tax_id: Option<TaxId>,
    pub email: Option<Email>,
    pub phone: Option<String>,
}

impl CustomerChanges {
    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.trade_name.is_none()
            && self.tax_id.is_none()
            && self.email.is_none()
            && self.phone.is_none()
    }
}

impl CustomerPayload {
    /// Validate a create request.
    ///
    /// # Errors
    ///
    /// Returns every field error found in the payload.
    pub fn into_new(self) -> Result<NewCustomer, ValidationErrors> {
        let mut v = Validator::default();
        let draft = NewCustomer {
            name: v.required_text("name", self.name, NAME_MAX),
            trade_name: v.optional_text("trade_name", self.trade_name, NAME_MAX),
            tax_id: v.optional_parsed("tax_id", self.tax_id, TaxId::parse),
            email: v.optional_parsed("email", self.email, Email::parse),
            phone: v.optional_parsed("phone", self.phone, parse_phone),
        };
        v.finish(draft)
    }

    /// Validate an update request.
    ///
    /// # Errors
    ///
    /// Returns every field error found in the payload.
    pub fn into_changes(self) -> Result<CustomerChanges, ValidationErrors> {
        let mut v = Validator::default();
        let changes = CustomerChanges {
            name: v.optional_text("name", self.name, NAME_MAX),
            trade_name: v.optional_text("trade_name", self.trade_name, NAME_MAX),
            tax_id: v.optional_parsed("tax_id", self.tax_id, TaxId::parse),
            email: v.optional_parsed("email", self.email, Email::parse),
            phone: v.optional_parsed("phone", self.phone, parse_phone),
        };
        v.finish(changes)
    }
}
