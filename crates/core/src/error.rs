//! Error types for Arbor
//!
//! This module defines the single error type surfaced by every layer of the
//! engine. We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! ## Error Kinds
//!
//! | Kind | Variant | Raised by |
//! |------|---------|-----------|
//! | Invalid path | [`ArborError::InvalidPath`] | Path codec, tree writer |
//! | No current document | [`ArborError::NoCurrentDocument`] | Session |
//! | Not found | [`ArborError::NotFound`] | Registry, reader, remover |
//! | Already exists | [`ArborError::AlreadyExists`] | Registry, tree writer |
//! | Parent missing | [`ArborError::ParentMissing`] | Tree writer |
//! | Non-container ancestor | [`ArborError::NonContainerAncestor`] | Tree writer |
//! | Type mismatch | [`ArborError::TypeMismatch`] | Typed getters |
//! | Store busy / store error | [`ArborError::Busy`], [`ArborError::Storage`] | Node store |

use crate::json::LimitError;
use crate::node_type::NodeType;
use thiserror::Error;

/// Result type alias for Arbor operations
pub type ArborResult<T> = std::result::Result<T, ArborError>;

/// Error type for all Arbor operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArborError {
    /// Malformed path syntax
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The path as supplied by the caller
        path: String,
        /// What is wrong with it
        reason: String,
    },

    /// An operation requiring a selected document was called without one
    #[error("no current document selected")]
    NoCurrentDocument,

    /// A path or document name does not exist
    #[error("not found: {what}")]
    NotFound {
        /// Path or document name
        what: String,
    },

    /// A path or document name is already occupied
    #[error("already exists: {what}")]
    AlreadyExists {
        /// Path or document name
        what: String,
    },

    /// A non-recursive insert targeted a path whose parent does not exist
    #[error("parent of '{path}' does not exist")]
    ParentMissing {
        /// The path whose parent is missing
        path: String,
    },

    /// The resolved parent of an insert is a scalar or null
    #[error("ancestor '{path}' is not a container")]
    NonContainerAncestor {
        /// Path of the scalar ancestor
        path: String,
    },

    /// A typed getter was called against a node of an incompatible type
    #[error("type mismatch at '{path}': expected {expected}, found {actual}")]
    TypeMismatch {
        /// Path of the node
        path: String,
        /// Requested type
        expected: NodeType,
        /// Stored type
        actual: NodeType,
    },

    /// A value cannot be represented in the node table
    #[error("invalid value: {reason}")]
    InvalidValue {
        /// Why the value was rejected
        reason: String,
    },

    /// A document, array or path exceeded a configured limit
    #[error("limit exceeded: {0}")]
    LimitExceeded(#[from] LimitError),

    /// The store could not acquire its lock before the busy timeout
    #[error("store busy: {message}")]
    Busy {
        /// Store diagnostic
        message: String,
    },

    /// The store failed to complete an operation
    #[error("storage error: {message}")]
    Storage {
        /// Store diagnostic
        message: String,
    },

    /// Stored rows violate a structural invariant
    #[error("data corruption: {message}")]
    Corruption {
        /// Which invariant failed and where
        message: String,
    },

    /// Configuration could not be read, parsed or written
    #[error("configuration error: {message}")]
    Config {
        /// Diagnostic
        message: String,
    },
}

impl ArborError {
    /// Create an InvalidPath error
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ArborError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(what: impl Into<String>) -> Self {
        ArborError::NotFound { what: what.into() }
    }

    /// Create an AlreadyExists error
    pub fn already_exists(what: impl Into<String>) -> Self {
        ArborError::AlreadyExists { what: what.into() }
    }

    /// Create a ParentMissing error
    pub fn parent_missing(path: impl Into<String>) -> Self {
        ArborError::ParentMissing { path: path.into() }
    }

    /// Create a NonContainerAncestor error
    pub fn non_container(path: impl Into<String>) -> Self {
        ArborError::NonContainerAncestor { path: path.into() }
    }

    /// Create a TypeMismatch error
    pub fn type_mismatch(path: impl Into<String>, expected: NodeType, actual: NodeType) -> Self {
        ArborError::TypeMismatch {
            path: path.into(),
            expected,
            actual,
        }
    }

    /// Create an InvalidValue error
    pub fn invalid_value(reason: impl Into<String>) -> Self {
        ArborError::InvalidValue {
            reason: reason.into(),
        }
    }

    /// Create a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        ArborError::Storage {
            message: message.into(),
        }
    }

    /// Create a Corruption error
    pub fn corruption(message: impl Into<String>) -> Self {
        ArborError::Corruption {
            message: message.into(),
        }
    }

    /// Create a Config error
    pub fn config(message: impl Into<String>) -> Self {
        ArborError::Config {
            message: message.into(),
        }
    }

    /// True if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, ArborError::NotFound { .. })
    }

    /// True if this is an AlreadyExists error
    pub fn is_already_exists(&self) -> bool {
        matches!(self, ArborError::AlreadyExists { .. })
    }

    /// Stable machine-readable code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ArborError::InvalidPath { .. } => "InvalidPath",
            ArborError::NoCurrentDocument => "NoCurrentDocument",
            ArborError::NotFound { .. } => "NotFound",
            ArborError::AlreadyExists { .. } => "AlreadyExists",
            ArborError::ParentMissing { .. } => "ParentMissing",
            ArborError::NonContainerAncestor { .. } => "NonContainerAncestor",
            ArborError::TypeMismatch { .. } => "TypeMismatch",
            ArborError::InvalidValue { .. } => "InvalidValue",
            ArborError::LimitExceeded(_) => "LimitExceeded",
            ArborError::Busy { .. } => "Busy",
            ArborError::Storage { .. } => "Storage",
            ArborError::Corruption { .. } => "Corruption",
            ArborError::Config { .. } => "Config",
        }
    }
}
