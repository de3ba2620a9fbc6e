//! Storage layer for Arbor
//!
//! This crate implements the relational side of the engine on SQLite:
//! - Schema: registry table, node table and its two indexes
//! - NodeStore: point lookups, range lookups, single-row mutation
//! - Bound maintenance: `open_gap` / `close_gap`
//! - Error mapping from SQLite result codes
//!
//! Transactions are owned by the caller. `NodeStore` only borrows a
//! connection, so every method runs inside whatever transaction that
//! connection has open.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod node;
pub mod schema;
pub mod sql;
pub mod store;

pub use node::{DocumentId, NodeRow};
pub use sql::sql_err;
pub use store::NodeStore;
