//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

use thiserror::Error;

/// Errors that can occur when parsing an ID from text (e.g. a URL segment).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input string is empty.
    #[error("identifier cannot be empty")]
    Empty,
    /// The input is not a base-10 integer that fits in 32 bits.
    #[error("identifier must be an integer, got '{0}'")]
    NotAnInteger(String),
    /// The input is zero or negative.
    #[error("identifier must be positive, got {0}")]
    NotPositive(i32),
}

/// Parse a positive `i32` identifier.
///
/// # Errors
///
/// Returns an [`IdError`] if the input is empty, not an integer, or not positive.
pub fn parse_positive_id(s: &str) -> Result<i32, IdError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(IdError::Empty);
    }

    let id = trimmed
        .parse::<i32>()
        .map_err(|_| IdError::NotAnInteger(trimmed.to_owned()))?;

    if id <= 0 {
        return Err(IdError::NotPositive(id));
    }

    Ok(id)
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_i32()`
/// - `FromStr` that only accepts positive integers
/// - `From<i32>` and `Into<i32>` implementations
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use catalogos_core::define_id;
/// define_id!(WarehouseId);
/// define_id!(InvoiceId);
///
/// let warehouse_id: WarehouseId = "7".parse().unwrap();
/// assert_eq!(warehouse_id.as_i32(), 7);
/// assert!("-1".parse::<InvoiceId>().is_err());
///
/// // These are different types, so this won't compile:
/// // let _: WarehouseId = InvoiceId::new(1);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                $crate::types::id::parse_positive_id(s).map(Self)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <i32 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_id!(CustomerId);
define_id!(AddressId);
define_id!(ProductId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_id() {
        let id: CustomerId = "42".parse().unwrap();
        assert_eq!(id, CustomerId::new(42));
        assert_eq!(" 7 ".parse::<ProductId>().unwrap().as_i32(), 7);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("".parse::<AddressId>(), Err(IdError::Empty));
        assert!(matches!(
            "abc".parse::<AddressId>(),
            Err(IdError::NotAnInteger(_))
        ));
        assert!(matches!(
            "99999999999".parse::<AddressId>(),
            Err(IdError::NotAnInteger(_))
        ));
        assert!(matches!(
            "1.5".parse::<AddressId>(),
            Err(IdError::NotAnInteger(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_positive() {
        assert_eq!("0".parse::<ProductId>(), Err(IdError::NotPositive(0)));
        assert_eq!("-3".parse::<ProductId>(), Err(IdError::NotPositive(-3)));
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&CustomerId::new(5)).unwrap();
        assert_eq!(json, "5");
        let back: CustomerId = serde_json::from_str("5").unwrap();
        assert_eq!(back.as_i32(), 5);
    }

    #[test]
    fn test_display() {
        assert_eq!(ProductId::new(12).to_string(), "12");
    }
}
