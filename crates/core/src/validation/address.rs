//! Address payload rules.

use serde::{Deserialize, Serialize};

use super::{ValidationErrors, Validator};
use crate::AddressKind;

const STREET_MAX: usize = 500;
const AREA_MAX: usize = 255;

/// JSON body accepted by `POST /clientes/{id}/domicilios` and `PUT /domicilios/{id}`.
///
/// The owning customer comes from the URL on create and can never be changed,
/// so `customer_id` is not a payload field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddressPayload {
    pub street: Option<String>,
    pub neighborhood: Option<String>,
    pub locality: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub kind: Option<AddressKind>,
}

/// A validated address ready to be inserted under a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub street: String,
    pub neighborhood: Option<String>,
    pub locality: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub kind: Option<AddressKind>,
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressChanges {
    pub street: Option<String>,
    pub neighborhood: Option<String>,
    pub locality: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub kind: Option<AddressKind>,
}

/// Postal codes: 4-10 letters, digits, spaces or hyphens.
fn parse_postal_code(value: &str) -> Result<String, &'static str> {
    let len = value.chars().count();
    if !(4..=10).contains(&len) {
        return Err("must be between 4 and 10 characters");
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-')
    {
        return Err("may only contain letters, digits, spaces and hyphens");
    }
    Ok(value.to_uppercase())
}

impl AddressPayload {
    /// Validate a create request.
    ///
    /// # Errors
    ///
    /// Returns every field error found in the payload.
    pub fn into_new(self) -> Result<NewAddress, ValidationErrors> {
        let mut v = Validator::default();
        let draft = NewAddress {
            street: v.required_text("street", self.street, STREET_MAX),
            neighborhood: v.optional_text("neighborhood", self.neighborhood, AREA_MAX),
            locality: v.optional_text("locality", self.locality, AREA_MAX),
            state: v.optional_text("state", self.state, AREA_MAX),
            postal_code: v.optional_parsed("postal_code", self.postal_code, parse_postal_code),
            kind: self.kind,
        };
        v.finish(draft)
    }

    /// Validate an update request.
    ///
    /// # Errors
    ///
    /// Returns every field error found in the payload.
    pub fn into_changes(self) -> Result<AddressChanges, ValidationErrors> {
        let mut v = Validator::default();
        let changes = AddressChanges {
            street: v.optional_text("street", self.street, STREET_MAX),
            neighborhood: v.optional_text("neighborhood", self.neighborhood, AREA_MAX),
            locality: v.optional_text("locality", self.locality, AREA_MAX),
            state: v.optional_text("state", self.state, AREA_MAX),
            postal_code: v.optional_parsed("postal_code", self.postal_code, parse_postal_code),
            kind: self.kind,
        };
        v.finish(changes)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_street_only() {
        let payload: AddressPayload = serde_json::from_str(r#"{"street":"Main"}"#).unwrap();
        let draft = payload.into_new().unwrap();
        assert_eq!(draft.street, "Main");
        assert!(draft.kind.is_none());
    }

    #[test]
    fn test_full_address() {
        let payload: AddressPayload = serde_json::from_str(
            r#"{
                "street": "Calle Test 123",
                "neighborhood": "Centro",
                "locality": "Guadalajara",
                "state": "Jalisco",
                "postal_code": "44100",
                "kind": "FACTURACION"
            }"#,
        )
        .unwrap();
        let draft = payload.into_new().unwrap();
        assert_eq!(draft.kind, Some(AddressKind::Billing));
        assert_eq!(draft.postal_code.as_deref(), Some("44100"));
    }

    #[test]
    fn test_missing_street() {
        let payload: AddressPayload = serde_json::from_str(r#"{"locality":"León"}"#).unwrap();
        assert!(payload.into_new().unwrap_err().has_field("street"));
    }

    #[test]
    fn test_bad_postal_code() {
        let payload = AddressPayload {
            street: Some("Main".to_owned()),
            postal_code: Some("4#".to_owned()),
            ..AddressPayload::default()
        };
        assert!(payload.into_new().unwrap_err().has_field("postal_code"));
    }

    #[test]
    fn test_owner_cannot_be_moved() {
        let result =
            serde_json::from_str::<AddressPayload>(r#"{"street":"Main","customer_id":9}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result = serde_json::from_str::<AddressPayload>(r#"{"kind":"HOME"}"#);
        assert!(result.is_err());
    }
}
