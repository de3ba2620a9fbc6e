//! Core types for Arbor
//!
//! This crate defines the foundational types used throughout the system:
//! - ArborError: Error taxonomy shared by every layer
//! - NodeType: Type tag stored with each node
//! - JsonValue: Generic value handed into and out of the engine
//! - Path codec: parsing, canonicalization and key escaping

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod json;
pub mod node_type;
pub mod path;

pub use error::{ArborError, ArborResult};
pub use json::{payload_of, JsonValue, LimitError, MAX_ARRAY_SIZE, MAX_NESTING_DEPTH, MAX_PATH_LENGTH};
pub use node_type::NodeType;
pub use path::{escape, unescape, ParsedPath, APPEND_MARKER, ROOT_LEAF, ROOT_PATH};
