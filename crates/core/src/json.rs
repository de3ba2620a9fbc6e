//! JSON values handed into and out of the engine
//!
//! This module defines:
//! - JsonValue: Newtype wrapper around serde_json::Value
//! - Scalar payload encoding for the node table `value` column
//! - Document limits
//!
//! `serde_json` is built with `preserve_order`, so objects iterate in
//! insertion order and reconstruction from the node table reproduces the
//! order in which keys were written.
//!
//! # Limits
//!
//! | Limit | Value | Constant |
//! |-------|-------|----------|
//! | Max nesting depth | 100 levels | [`MAX_NESTING_DEPTH`] |
//! | Max path length | 256 segments | [`MAX_PATH_LENGTH`] |
//! | Max array size | 1M elements | [`MAX_ARRAY_SIZE`] |

use crate::error::{ArborError, ArborResult};
use crate::node_type::NodeType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use thiserror::Error;

// =============================================================================
// Limits
// =============================================================================

/// Default maximum nesting depth of a value written in one call
///
/// Container population recurses once per level, so this also bounds the
/// writer's stack usage.
pub const MAX_NESTING_DEPTH: usize = 100;

/// Maximum number of segments in a path
pub const MAX_PATH_LENGTH: usize = 256;

/// Maximum number of elements in a single array written in one call
pub const MAX_ARRAY_SIZE: usize = 1_000_000;

/// Error type for limit violations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LimitError {
    /// Value nesting exceeds maximum depth
    #[error("nesting depth {depth} exceeds maximum of {max} levels")]
    NestingTooDeep {
        /// Actual nesting depth
        depth: usize,
        /// Maximum allowed depth
        max: usize,
    },

    /// Path exceeds maximum length
    #[error("path length {length} exceeds maximum of {max} segments")]
    PathTooLong {
        /// Actual path length
        length: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// Array exceeds maximum size
    #[error("array size {size} exceeds maximum of {max} elements")]
    ArrayTooLarge {
        /// Actual array size
        size: usize,
        /// Maximum allowed size
        max: usize,
    },
}

// =============================================================================
// JsonValue
// =============================================================================

/// JSON value wrapper
///
/// Newtype around serde_json::Value providing:
/// - Direct access to underlying serde_json::Value via Deref
/// - Easy construction from common types
/// - Conversion to and from node table payloads
///
/// # Examples
///
/// ```
/// use arbor_core::JsonValue;
///
/// let obj = JsonValue::object();
/// let arr = JsonValue::array();
/// let n = JsonValue::from(42i64);
///
/// assert!(obj.is_object());
/// assert!(arr.is_array());
/// assert_eq!(n.as_i64(), Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct JsonValue(serde_json::Value);

impl JsonValue {
    /// Create a null JSON value
    pub fn null() -> Self {
        JsonValue(serde_json::Value::Null)
    }

    /// Create an empty JSON object
    pub fn object() -> Self {
        JsonValue(serde_json::Value::Object(serde_json::Map::new()))
    }

    /// Create an empty JSON array
    pub fn array() -> Self {
        JsonValue(serde_json::Value::Array(Vec::new()))
    }

    /// Create an empty container of the given type
    ///
    /// Returns `None` for scalar types.
    pub fn empty_container(node_type: NodeType) -> Option<Self> {
        match node_type {
            NodeType::Object => Some(Self::object()),
            NodeType::Array => Some(Self::array()),
            _ => None,
        }
    }

    /// Get the underlying serde_json::Value
    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }

    /// Get a reference to the underlying serde_json::Value
    pub fn as_inner(&self) -> &serde_json::Value {
        &self.0
    }

    /// Type this value is stored as
    pub fn node_type(&self) -> NodeType {
        NodeType::of(&self.0)
    }

    /// Append to an array or insert into an object
    ///
    /// `key` is ignored for arrays. Does nothing for scalars.
    pub fn attach(&mut self, key: String, child: JsonValue) {
        match &mut self.0 {
            serde_json::Value::Array(items) => items.push(child.0),
            serde_json::Value::Object(map) => {
                map.insert(key, child.0);
            }
            _ => {}
        }
    }

    // ========================================================================
    // Node table payloads
    // ========================================================================

    /// Encode the scalar payload stored in the `value` column
    ///
    /// See [`payload_of`].
    pub fn scalar_payload(&self) -> ArborResult<Option<String>> {
        payload_of(&self.0)
    }

    /// Decode a stored scalar
    ///
    /// Containers decode to an empty container of their type; callers fill
    /// them from the subtree rows.
    pub fn from_payload(node_type: NodeType, payload: Option<&str>) -> ArborResult<Self> {
        let missing = || ArborError::corruption(format!("{} node has no value", node_type));
        let value = match node_type {
            NodeType::Null => serde_json::Value::Null,
            NodeType::Object => return Ok(Self::object()),
            NodeType::Array => return Ok(Self::array()),
            NodeType::String => serde_json::Value::String(payload.ok_or_else(missing)?.to_string()),
            NodeType::Bool => match payload.ok_or_else(missing)? {
                "true" => serde_json::Value::Bool(true),
                "false" => serde_json::Value::Bool(false),
                other => {
                    return Err(ArborError::corruption(format!("invalid bool '{}'", other)));
                }
            },
            NodeType::Int64 => {
                let raw = payload.ok_or_else(missing)?;
                let i: i64 = raw
                    .parse()
                    .map_err(|_| ArborError::corruption(format!("invalid int64 '{}'", raw)))?;
                serde_json::Value::from(i)
            }
            NodeType::Double => {
                let raw = payload.ok_or_else(missing)?;
                let f: f64 = raw
                    .parse()
                    .map_err(|_| ArborError::corruption(format!("invalid double '{}'", raw)))?;
                serde_json::Number::from_f64(f)
                    .map(serde_json::Value::Number)
                    .ok_or_else(|| ArborError::corruption(format!("non-finite double '{}'", raw)))?
            }
        };
        Ok(JsonValue(value))
    }

    // ========================================================================
    // Limits
    // ========================================================================

    /// Maximum nesting depth of this value
    ///
    /// Returns 0 for scalars and counts nested objects/arrays.
    pub fn nesting_depth(&self) -> usize {
        fn depth_of(value: &serde_json::Value) -> usize {
            match value {
                serde_json::Value::Array(arr) => 1 + arr.iter().map(depth_of).max().unwrap_or(0),
                serde_json::Value::Object(obj) => 1 + obj.values().map(depth_of).max().unwrap_or(0),
                _ => 0,
            }
        }
        depth_of(&self.0)
    }

    /// Largest array anywhere in this value
    pub fn max_array_size(&self) -> usize {
        fn max_arr_size(value: &serde_json::Value) -> usize {
            match value {
                serde_json::Value::Array(arr) => {
                    let nested_max = arr.iter().map(max_arr_size).max().unwrap_or(0);
                    arr.len().max(nested_max)
                }
                serde_json::Value::Object(obj) => obj.values().map(max_arr_size).max().unwrap_or(0),
                _ => 0,
            }
        }
        max_arr_size(&self.0)
    }

    /// Validate nesting depth against `max_depth` and array sizes against
    /// [`MAX_ARRAY_SIZE`]
    pub fn validate(&self, max_depth: usize) -> Result<(), LimitError> {
        let depth = self.nesting_depth();
        if depth > max_depth {
            return Err(LimitError::NestingTooDeep {
                depth,
                max: max_depth,
            });
        }
        let size = self.max_array_size();
        if size > MAX_ARRAY_SIZE {
            return Err(LimitError::ArrayTooLarge {
                size,
                max: MAX_ARRAY_SIZE,
            });
        }
        Ok(())
    }
}

/// Encode the scalar payload stored in the `value` column
///
/// Containers and null carry no payload. Doubles must be finite.
pub fn payload_of(value: &serde_json::Value) -> ArborResult<Option<String>> {
    match value {
        serde_json::Value::Null | serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            Ok(None)
        }
        serde_json::Value::Bool(b) => Ok(Some(b.to_string())),
        serde_json::Value::String(s) => Ok(Some(s.clone())),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Some(i.to_string()));
            }
            match n.as_f64() {
                Some(f) if f.is_finite() => Ok(Some(encode_double(f))),
                _ => Err(ArborError::invalid_value(format!(
                    "number {} cannot be stored as a double",
                    n
                ))),
            }
        }
    }
}

/// Shortest text that parses back to the same double
///
/// Integral doubles keep a trailing `.0` so the column stays readable as a
/// double.
fn encode_double(f: f64) -> String {
    let s = f.to_string();
    if s.contains(['.', 'e', 'E']) {
        s
    } else {
        format!("{}.0", s)
    }
}

impl Deref for JsonValue {
    type Target = serde_json::Value;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for JsonValue {
    fn default() -> Self {
        Self::null()
    }
}

impl From<serde_json::Value> for JsonValue {
    fn from(v: serde_json::Value) -> Self {
        JsonValue(v)
    }
}

impl From<JsonValue> for serde_json::Value {
    fn from(v: JsonValue) -> Self {
        v.0
    }
}

impl From<bool> for JsonValue {
    fn from(v: bool) -> Self {
        JsonValue(serde_json::Value::Bool(v))
    }
}

impl From<i64> for JsonValue {
    fn from(v: i64) -> Self {
        JsonValue(serde_json::Value::Number(v.into()))
    }
}

impl From<i32> for JsonValue {
    fn from(v: i32) -> Self {
        JsonValue(serde_json::Value::Number(v.into()))
    }
}

impl From<f64> for JsonValue {
    fn from(v: f64) -> Self {
        JsonValue(
            serde_json::Number::from_f64(v)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
        )
    }
}

impl From<&str> for JsonValue {
    fn from(v: &str) -> Self {
        JsonValue(serde_json::Value::String(v.to_string()))
    }
}

impl From<String> for JsonValue {
    fn from(v: String) -> Self {
        JsonValue(serde_json::Value::String(v))
    }
}
