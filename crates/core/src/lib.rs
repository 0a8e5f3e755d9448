//! Catalogos Core - Shared types and validation.
//!
//! This crate provides the pieces shared by every Catalogos component:
//! - `api` - The HTTP catalog service (customers, addresses, products)
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Payloads are validated here so that invalid input is
//! rejected before anything touches storage.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails and tax IDs
//! - [`validation`] - Payload schemas and the rules that turn them into drafts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::{
    AddressChanges, AddressPayload, CustomerChanges, CustomerPayload, FieldError, ListParams,
    NewAddress, NewCustomer, NewProduct, Page, ProductChanges, ProductPayload, ValidationErrors,
};
