//! Database module: models, schema and storage for bank records.
//!
//! Layout:
//! - `models.rs`: the `Bank` row, validated `BankInput`, raw `BankPayload`
//! - `schema.rs`: SQL DDL run at startup
//! - `connection.rs`: one-connection-per-operation scoping
//! - `sqlite.rs`: the parameterized CRUD queries

pub mod connection;
pub mod models;
pub mod schema;
pub mod sqlite;

pub use connection::ConnectionManager;
pub use models::{Bank, BankInput, BankPayload, ValidationError};
pub use schema::SQLITE_INIT;
pub use sqlite::BankStorage;
