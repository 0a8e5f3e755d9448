//! Mexican taxpayer registry code (RFC).

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Three letters for companies, four for individuals, a `YYMMDD` date and a
/// three character check suffix.
static RFC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // Literal pattern, covered by tests
    Regex::new(r"^[A-ZÑ&]{3,4}\d{6}[A-Z\d]{3}$").unwrap()
});

/// Errors that can occur when parsing a [`TaxId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxIdError {
    /// The input has the wrong number of characters.
    #[error("tax id must be 12 or 13 characters")]
    InvalidLength,
    /// The input does not follow the RFC layout.
    #[error("tax id must look like ABC123456XYZ or ABCD123456XYZ")]
    InvalidFormat,
}

/// An RFC (Registro Federal de Contribuyentes) code.
///
/// Input is upper-cased before checking, so `test123456abc` is accepted and
/// stored as `TEST123456ABC`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaxId(String);

impl TaxId {
    /// Parse a `TaxId` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`TaxIdError`] if the input is not a 12 or 13 character RFC.
    pub fn parse(s: &str) -> Result<Self, TaxIdError> {
        let upper = s.trim().to_uppercase();
        let len = upper.chars().count();
        if !(12..=13).contains(&len) {
            return Err(TaxIdError::InvalidLength);
        }
        if !RFC_PATTERN.is_match(&upper) {
            return Err(TaxIdError::InvalidFormat);
        }
        Ok(Self(upper))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for TaxId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_company_and_individual() {
        assert_eq!(TaxId::parse("ABC123456XY9").unwrap().as_str(), "ABC123456XY9");
        assert_eq!(
            TaxId::parse("TEST123456ABC").unwrap().as_str(),
            "TEST123456ABC"
        );
        assert_eq!(TaxId::parse("ÑAB123456A1B").unwrap().as_str(), "ÑAB123456A1B");
    }

    #[test]
    fn test_is_uppercased() {
        assert_eq!(
            TaxId::parse(" test123456abc ").unwrap().as_str(),
            "TEST123456ABC"
        );
    }

    #[test]
    fn test_rejections() {
        assert_eq!(TaxId::parse("ABC12345"), Err(TaxIdError::InvalidLength));
        assert_eq!(
            TaxId::parse("ABCDE12345678"),
            Err(TaxIdError::InvalidFormat)
        );
        assert_eq!(
            TaxId::parse("AB1234567XYZ"),
            Err(TaxIdError::InvalidFormat)
        );
    }
}
