//! sl-db - Warehouse abstraction layer for Starlift
//!
//! This crate provides the `Warehouse` trait, the DuckDB implementation
//! used for local runs and tests, and a Redshift stub for the production
//! warehouse.

pub mod duckdb;
pub mod error;
pub mod redshift;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use redshift::RedshiftBackend;
pub use traits::Warehouse;
