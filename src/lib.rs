//! Arbor - embedded transactional storage for JSON value trees
//!
//! Arbor stores each document as rows of a SQLite table using a nested-set
//! encoding. Any node can be read, replaced or removed by path without
//! loading or rewriting the rest of the document.
//!
//! # Quick Start
//!
//! ```ignore
//! use arbor::{Database, NodeType};
//! use serde_json::json;
//!
//! // Create an in-memory database
//! let db = Database::ephemeral()?;
//! let doc = db.create_document("doc1")?;
//!
//! doc.add("/config", json!({"name": "alice"}), false)?;
//! assert_eq!(doc.get_string("/config/name")?, "alice");
//!
//! doc.add("/list", json!([]), false)?;
//! doc.add("/list/#", json!(10), false)?;
//! doc.add("/list/#", json!(20), false)?;
//! doc.remove("/list/0")?;
//! assert_eq!(doc.get("/list")?.into_inner(), json!([20]));
//! ```
//!
//! # Architecture
//!
//! - `arbor-core`: errors, node types, value wrapper, path codec
//! - `arbor-storage`: node table access over SQLite
//! - `arbor-engine`: database handle, registry and tree algorithms
//!
//! Only the engine's handles and the core types are re-exported here.

pub use arbor_core::{
    escape, unescape, ArborError, ArborResult, JsonValue, LimitError, NodeType, ParsedPath,
};
pub use arbor_engine::{
    ArborConfig, Database, Document, Session, CONFIG_FILE_NAME, DATABASE_FILE_NAME,
};
pub use arbor_storage::DocumentId;
