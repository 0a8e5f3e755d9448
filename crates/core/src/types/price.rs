//! Non-negative product price using decimal arithmetic.
//!
//! Prices are stored as `NUMERIC(14, 4)` so at most ten integer digits and four
//! decimal places survive a round-trip through the database. On the wire they
//! are plain JSON numbers.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price must be greater than or equal to 0")]
    Negative,
    /// The amount is NaN or infinite.
    #[error("price must be a finite number")]
    NotFinite,
    /// The amount does not fit in the storage column.
    #[error("price must be less than {max}")]
    TooLarge {
        /// Exclusive upper bound.
        max: u64,
    },
    /// The amount has more decimal places than the storage column keeps.
    #[error("price must have at most {max} decimal places")]
    TooManyDecimals {
        /// Maximum number of decimal places.
        max: u32,
    },
}

/// A product price.
///
/// ## Constraints
///
/// - `0 <= amount < 10_000_000_000`
/// - At most [`Price::MAX_SCALE`] decimal places
///
/// ```
/// use catalogos_core::Price;
///
/// assert!(Price::from_f64(9.99).is_ok());
/// assert!(Price::from_f64(0.0).is_ok());
/// assert!(Price::from_f64(-1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Maximum number of decimal places.
    pub const MAX_SCALE: u32 = 4;

    /// Exclusive upper bound on the amount.
    pub const UPPER_BOUND: u64 = 10_000_000_000;

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceError`] if the amount is negative, too large, or has
    /// too many decimal places.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }

        if amount >= Decimal::from(Self::UPPER_BOUND) {
            return Err(PriceError::TooLarge {
                max: Self::UPPER_BOUND,
            });
        }

        let amount = amount.normalize();
        if amount.scale() > Self::MAX_SCALE {
            return Err(PriceError::TooManyDecimals {
                max: Self::MAX_SCALE,
            });
        }

        Ok(Self(amount))
    }

    /// Create a price from a JSON-style floating point number.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceError`] under the same rules as [`Price::new`], or
    /// [`PriceError::NotFinite`] for NaN and infinities.
    pub fn from_f64(value: f64) -> Result<Self, PriceError> {
        if !value.is_finite() {
            return Err(PriceError::NotFinite);
        }
        if value < 0.0 {
            return Err(PriceError::Negative);
        }

        let amount = Decimal::from_f64(value).ok_or(PriceError::TooLarge {
            max: Self::UPPER_BOUND,
        })?;
        Self::new(amount)
    }

    /// The zero price.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Returns the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = f64::try_from(self.0).map_err(serde::ser::Error::custom)?;
        serializer.serialize_f64(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_zero_is_valid() {
        assert_eq!(Price::from_f64(0.0).unwrap(), Price::zero());
        assert_eq!(Price::from_f64(-0.0).unwrap(), Price::zero());
    }

    #[test]
    fn test_negative_is_rejected() {
        assert_eq!(Price::from_f64(-1.0), Err(PriceError::Negative));
        assert_eq!(
            Price::new(Decimal::from_str("-0.01").unwrap()),
            Err(PriceError::Negative)
        );
    }

    #[test]
    fn test_non_finite_is_rejected() {
        assert_eq!(Price::from_f64(f64::NAN), Err(PriceError::NotFinite));
        assert_eq!(Price::from_f64(f64::INFINITY), Err(PriceError::NotFinite));
    }

    #[test]
    fn test_bounds() {
        assert!(Price::from_f64(9_999_999_999.5).is_ok());
        assert!(matches!(
            Price::from_f64(10_000_000_000.0),
            Err(PriceError::TooLarge { .. })
        ));
        assert!(matches!(
            Price::from_f64(1e40),
            Err(PriceError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_scale() {
        assert!(Price::new(Decimal::from_str("1.2345").unwrap()).is_ok());
        assert!(matches!(
            Price::new(Decimal::from_str("1.23456").unwrap()),
            Err(PriceError::TooManyDecimals { max: 4 })
        ));
        // Trailing zeros do not count against the scale.
        assert!(Price::new(Decimal::from_str("1.500000").unwrap()).is_ok());
    }

    #[test]
    fn test_serializes_as_number() {
        let price = Price::from_f64(9.99).unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "9.99");
        assert_eq!(price.to_string(), "9.99");
    }
}
