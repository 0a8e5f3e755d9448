//! Address purpose.

use serde::{Deserialize, Serialize};

/// What an address is used for.
///
/// Serialized as `BILLING` / `SHIPPING`; the Spanish names `FACTURACION` /
/// `ENVIO` are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddressKind {
    #[serde(alias = "FACTURACION")]
    Billing,
    #[serde(alias = "ENVIO")]
    Shipping,
}

impl AddressKind {
    /// Column value used in the `addresses.kind` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Billing => "BILLING",
            Self::Shipping => "SHIPPING",
        }
    }

    /// Parse the column value written by [`AddressKind::as_str`].
    #[must_use]
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "BILLING" => Some(Self::Billing),
            "SHIPPING" => Some(Self::Shipping),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_spanish_aliases() {
        let kind: AddressKind = serde_json::from_str("\"FACTURACION\"").unwrap();
        assert_eq!(kind, AddressKind::Billing);
        let kind: AddressKind = serde_json::from_str("\"ENVIO\"").unwrap();
        assert_eq!(kind, AddressKind::Shipping);
    }

    #[test]
    fn test_db_round_trip() {
        for kind in [AddressKind::Billing, AddressKind::Shipping] {
            assert_eq!(AddressKind::from_db(kind.as_str()), Some(kind));
        }
        assert_eq!(AddressKind::from_db("HOME"), None);
        assert_eq!(
            serde_json::to_string(&AddressKind::Shipping).unwrap(),
            "\"SHIPPING\""
        );
    }
}
