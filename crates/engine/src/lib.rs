//! Database engine for Arbor
//!
//! This crate ties the lower layers together:
//! - Database: connection, configuration and transaction scope
//! - Document registry: create, open and remove named documents
//! - Tree writer, remover and reader: the nested-set algorithms
//! - Document: path operations scoped to one document
//! - Session: a current-document pointer over a database
//!
//! The engine is the only component that opens transactions. The tree
//! algorithms run on a `NodeStore` borrowed from one and never commit.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod database;
pub mod document;
pub mod session;
mod tree;

pub use database::{ArborConfig, Database, CONFIG_FILE_NAME, DATABASE_FILE_NAME};
pub use document::Document;
pub use session::Session;
