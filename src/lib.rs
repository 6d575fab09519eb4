//! Command line expense tracker backed by SQLite or PostgreSQL.
//!
//! The `storage` module defines the `Connector` trait both backends
//! implement; everything else composes it. `models` validates and persists
//! expenses, `ops`, `report`, and `import` are the domain operations, and
//! `config` keeps the active-backend slot between runs.

pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod ops;
pub mod postgres_storage;
pub mod report;
pub mod sqlite_storage;
pub mod storage;

pub use error::Error;
pub use models::Expense;
pub use storage::{Connector, Row, SqlValue, StorageError};
