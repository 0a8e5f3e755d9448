//! Payload validation.
//!
//! Every resource has a payload struct that mirrors its JSON body. Payload
//! fields are all optional at the serde level so that a missing field is
//! reported as a [`FieldError`] next to every other problem in the body,
//! instead of aborting on the first one. Unknown fields are rejected by serde.
//!
//! Validation turns a payload into either a draft for a new row (`New*`) or a
//! set of partial changes (`*Changes`). Nothing here performs I/O.

pub mod address;
pub mod customer;
pub mod pagination;
pub mod product;

use std::fmt;

use serde::Serialize;

pub use address::{AddressChanges, AddressPayload, NewAddress};
pub use customer::{CustomerChanges, CustomerPayload, NewCustomer};
pub use pagination::{ListParams, Page};
pub use product::{NewProduct, ProductChanges, ProductPayload};

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name as it appears in the JSON body or query string.
    pub field: String,
    /// Human readable reason.
    pub message: String,
}

impl FieldError {
    /// Create a field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// All field errors found in one payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Build from a single field error.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![FieldError::new(field, message)])
    }

    /// The individual field errors.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Whether `field` has at least one error.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// Prefix every field name, e.g. `addresses[0].street` when seeding.
    #[must_use]
    pub fn prefixed(self, prefix: &str) -> Self {
        Self(
            self.0
                .into_iter()
                .map(|e| FieldError::new(format!("{prefix}.{}", e.field), e.message))
                .collect(),
        )
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid payload")?;
        for (i, err) in self.0.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{} {}", err.field, err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Collects field errors while a payload is checked.
///
/// Checks return a usable value even when they fail (an empty string, the
/// zero price) so drafts can be assembled unconditionally; [`Validator::finish`]
/// discards the draft if anything was recorded.
#[derive(Debug, Default)]
pub(crate) struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub(crate) fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// A required, trimmed, non-empty string of at most `max` characters.
    pub(crate) fn required_text(&mut self, field: &str, value: Option<String>, max: usize) -> String {
        match value {
            Some(value) => self.text(field, &value, max).unwrap_or_default(),
            None => {
                self.reject(field, "is required");
                String::new()
            }
        }
    }

    /// An optional string; when present it follows the same rules as
    /// [`Validator::required_text`].
    pub(crate) fn optional_text(
        &mut self,
        field: &str,
        value: Option<String>,
        max: usize,
    ) -> Option<String> {
        value.and_then(|value| self.text(field, &value, max))
    }

    /// An optional string run through a parser; parse errors become field errors.
    pub(crate) fn optional_parsed<T, E: fmt::Display>(
        &mut self,
        field: &str,
        value: Option<String>,
        parse: impl FnOnce(&str) -> Result<T, E>,
    ) -> Option<T> {
        let value = value?;
        match parse(value.trim()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                self.reject(field, e.to_string());
                None
            }
        }
    }

    fn text(&mut self, field: &str, value: &str, max: usize) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.reject(field, "must not be empty");
            return None;
        }
        if trimmed.chars().count() > max {
            self.reject(field, format!("must be at most {max} characters"));
            return None;
        }
        Some(trimmed.to_owned())
    }

    pub(crate) fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

/// Phone numbers: 10-20 characters of digits, spaces and `+ - ( )`.
pub(crate) fn parse_phone(value: &str) -> Result<String, &'static str> {
    let len = value.chars().count();
    if !(10..=20).contains(&len) {
        return Err("must be between 10 and 20 characters");
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'))
    {
        return Err("may only contain digits, spaces and + - ( )");
    }
    Ok(value.to_owned())
}
