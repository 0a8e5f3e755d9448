//! Core types for Catalogos.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address_kind;
pub mod email;
pub mod id;
pub mod price;
pub mod tax_id;

pub use address_kind::AddressKind;
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use tax_id::{TaxId, TaxIdError};
