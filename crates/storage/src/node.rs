//! Node table rows

use arbor_core::{path, NodeType};
use rusqlite::Row;
use std::fmt;

/// Identifier of a registered document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub i64);

impl DocumentId {
    /// Raw rowid of the registry entry
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the node table
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRow {
    /// Row id, monotonic within the table
    pub id: i64,
    /// Absolute escaped path
    pub full_path: String,
    /// Escaped final path component
    pub leaf_name: String,
    /// Stored type
    pub node_type: NodeType,
    /// Scalar payload; `None` for null and containers
    pub value: Option<String>,
    /// Nested-set left bound
    pub lft: i64,
    /// Nested-set right bound
    pub rgt: i64,
}

/// Column list matching [`NodeRow::from_row`]
pub(crate) const NODE_COLUMNS: &str = "id, full_path, leaf_name, type, value, lft, rgt";

impl NodeRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let code: i64 = row.get(3)?;
        let node_type =
            NodeType::from_code(code).ok_or(rusqlite::Error::IntegralValueOutOfRange(3, code))?;
        Ok(NodeRow {
            id: row.get(0)?,
            full_path: row.get(1)?,
            leaf_name: row.get(2)?,
            node_type,
            value: row.get(4)?,
            lft: row.get(5)?,
            rgt: row.get(6)?,
        })
    }

    /// True if no rows nest inside this one
    pub fn is_leaf(&self) -> bool {
        self.rgt - self.lft == 1
    }

    /// True if `other` lies strictly inside this node's bounds
    pub fn contains(&self, other: &NodeRow) -> bool {
        self.lft < other.lft && other.rgt < self.rgt
    }

    /// Unescaped leaf name
    pub fn key(&self) -> String {
        path::unescape(&self.leaf_name)
    }
}
