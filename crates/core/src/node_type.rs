//! Node types
//!
//! Every row in the node table carries one of seven types. The numeric code
//! is what lands in the `type` column, so the discriminants are frozen.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type tag of a stored node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum NodeType {
    /// JSON null
    Null = 0,
    /// 64-bit signed integer
    Int64 = 1,
    /// IEEE-754 double
    Double = 2,
    /// Boolean
    Bool = 3,
    /// UTF-8 string
    String = 4,
    /// Object (string keys, insertion ordered)
    Object = 5,
    /// Array (contiguous 0-based indices)
    Array = 6,
}

impl NodeType {
    /// Code stored in the `type` column
    pub fn code(self) -> i64 {
        self as i64
    }

    /// Decode a `type` column value
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(NodeType::Null),
            1 => Some(NodeType::Int64),
            2 => Some(NodeType::Double),
            3 => Some(NodeType::Bool),
            4 => Some(NodeType::String),
            5 => Some(NodeType::Object),
            6 => Some(NodeType::Array),
            _ => None,
        }
    }

    /// Lowercase type name
    pub fn name(self) -> &'static str {
        match self {
            NodeType::Null => "null",
            NodeType::Int64 => "int64",
            NodeType::Double => "double",
            NodeType::Bool => "bool",
            NodeType::String => "string",
            NodeType::Object => "object",
            NodeType::Array => "array",
        }
    }

    /// Objects and arrays may have children
    pub fn is_container(self) -> bool {
        matches!(self, NodeType::Object | NodeType::Array)
    }

    /// Type a JSON value would be stored as
    ///
    /// Integers that fit `i64` are `Int64`; every other number is `Double`.
    pub fn of(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => NodeType::Null,
            serde_json::Value::Bool(_) => NodeType::Bool,
            serde_json::Value::Number(n) if n.is_i64() => NodeType::Int64,
            serde_json::Value::Number(_) => NodeType::Double,
            serde_json::Value::String(_) => NodeType::String,
            serde_json::Value::Array(_) => NodeType::Array,
            serde_json::Value::Object(_) => NodeType::Object,
        }
    }

    /// Whether a node stored as `self` can be read back as `requested`
    ///
    /// Integers widen to doubles; nothing else converts.
    pub fn satisfies(self, requested: NodeType) -> bool {
        self == requested || (self == NodeType::Int64 && requested == NodeType::Double)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "null" => Ok(NodeType::Null),
            "int64" | "int" => Ok(NodeType::Int64),
            "double" => Ok(NodeType::Double),
            "bool" => Ok(NodeType::Bool),
            "string" => Ok(NodeType::String),
            "object" => Ok(NodeType::Object),
            "array" => Ok(NodeType::Array),
            other => Err(format!("unknown node type '{}'", other)),
        }
    }
}
