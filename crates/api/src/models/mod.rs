//! Domain models returned by the catalog API.
//!
//! These are validated domain objects, separate from database row types.
//! Every model serializes to the JSON shape clients see; optional attributes
//! are always present and `null` when unset.

pub mod address;
pub mod customer;
pub mod product;

pub use address::Address;
pub use customer::Customer;
pub use product::Product;
