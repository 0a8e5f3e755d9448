//! Catálogos catalog service library.
//!
//! CRUD over customers, their addresses and products, served with axum on
//! top of a [`db::CatalogStore`]. The binary in `main.rs` wires this to
//! `PostgreSQL`; tests wire it to [`db::MemoryCatalogStore`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

pub use app::router;
