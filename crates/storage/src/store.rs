//! NodeStore: row-level access to the registry and node tables
//!
//! ## Design
//!
//! `NodeStore` borrows a connection (usually an open transaction) and exposes
//! the primitives the tree algorithms are built from: point lookup by path,
//! range lookup by bounds, single-row insert/update/delete and the two bound
//! renumbering operations.
//!
//! [`NodeStore::open_gap`] and [`NodeStore::close_gap`] are the only methods
//! that shift `lft`/`rgt` of existing rows. Everything that moves bounds goes
//! through them.
//!
//! Statements are prepared through the connection's statement cache, so the
//! per-call cost after warm-up is a bind and a step.

use crate::node::{DocumentId, NodeRow, NODE_COLUMNS};
use crate::sql::{is_unique_violation, sql_err};
use arbor_core::{ArborError, ArborResult, NodeType};
use rusqlite::{params, Connection, OptionalExtension};

/// Row-level view over the Arbor tables
pub struct NodeStore<'c> {
    conn: &'c Connection,
}

impl<'c> NodeStore<'c> {
    /// Wrap a connection or transaction
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Registry
    // ========================================================================

    /// Register a document name
    ///
    /// Fails with `AlreadyExists` if the name is taken.
    pub fn create_document(&self, name: &str) -> ArborResult<DocumentId> {
        let mut stmt = self
            .conn
            .prepare_cached("INSERT INTO documents (name) VALUES (?1)")
            .map_err(sql_err)?;
        match stmt.execute(params![name]) {
            Ok(_) => Ok(DocumentId(self.conn.last_insert_rowid())),
            Err(e) if is_unique_violation(&e) => {
                Err(ArborError::already_exists(format!("document '{}'", name)))
            }
            Err(e) => Err(sql_err(e)),
        }
    }

    /// Look up a document id by name
    pub fn document_id(&self, name: &str) -> ArborResult<Option<DocumentId>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id FROM documents WHERE name = ?1")
            .map_err(sql_err)?;
        stmt.query_row(params![name], |row| row.get::<_, i64>(0))
            .optional()
            .map(|id| id.map(DocumentId))
            .map_err(sql_err)
    }

    /// Name registered for `doc`, if it still exists
    pub fn document_name(&self, doc: DocumentId) -> ArborResult<Option<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT name FROM documents WHERE id = ?1")
            .map_err(sql_err)?;
        stmt.query_row(params![doc.0], |row| row.get(0))
            .optional()
            .map_err(sql_err)
    }

    /// All registered documents, ordered by id
    pub fn documents(&self) -> ArborResult<Vec<(DocumentId, String)>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name FROM documents ORDER BY id")
            .map_err(sql_err)?;
        let rows = stmt
            .query_map([], |row| Ok((DocumentId(row.get(0)?), row.get(1)?)))
            .map_err(sql_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
    }

    /// Delete every node of a document and its registry row
    ///
    /// Returns the number of node rows removed.
    pub fn delete_document(&self, doc: DocumentId) -> ArborResult<usize> {
        let removed = self
            .conn
            .prepare_cached("DELETE FROM nodes WHERE doc_id = ?1")
            .and_then(|mut stmt| stmt.execute(params![doc.0]))
            .map_err(sql_err)?;
        self.conn
            .prepare_cached("DELETE FROM documents WHERE id = ?1")
            .and_then(|mut stmt| stmt.execute(params![doc.0]))
            .map_err(sql_err)?;
        Ok(removed)
    }

    // ========================================================================
    // Point lookups
    // ========================================================================

    /// Look up a node by its canonical path
    pub fn lookup(&self, doc: DocumentId, full_path: &str) -> ArborResult<Option<NodeRow>> {
        self.query_one(
            &format!(
                "SELECT {} FROM nodes WHERE doc_id = ?1 AND full_path = ?2",
                NODE_COLUMNS
            ),
            params![doc.0, full_path],
        )
    }

    /// The tightest node whose bounds strictly enclose `node`
    pub fn parent_of(&self, doc: DocumentId, node: &NodeRow) -> ArborResult<Option<NodeRow>> {
        self.query_one(
            &format!(
                "SELECT {} FROM nodes WHERE doc_id = ?1 AND lft < ?2 AND rgt > ?3
                 ORDER BY lft DESC LIMIT 1",
                NODE_COLUMNS
            ),
            params![doc.0, node.lft, node.rgt],
        )
    }

    /// The child whose right bound closes `parent`, if any
    pub fn last_child(&self, doc: DocumentId, parent: &NodeRow) -> ArborResult<Option<NodeRow>> {
        if parent.is_leaf() {
            return Ok(None);
        }
        self.query_one(
            &format!(
                "SELECT {} FROM nodes WHERE doc_id = ?1 AND rgt = ?2 AND lft > ?3",
                NODE_COLUMNS
            ),
            params![doc.0, parent.rgt - 1, parent.lft],
        )
    }

    // ========================================================================
    // Range lookups
    // ========================================================================

    /// Every row strictly inside `node`, in depth-first order
    pub fn descendants(&self, doc: DocumentId, node: &NodeRow) -> ArborResult<Vec<NodeRow>> {
        self.query_many(
            &format!(
                "SELECT {} FROM nodes WHERE doc_id = ?1 AND lft > ?2 AND rgt < ?3
                 ORDER BY lft",
                NODE_COLUMNS
            ),
            params![doc.0, node.lft, node.rgt],
        )
    }

    /// Rows whose left bound lies strictly between `after` and `before`,
    /// ordered by left bound
    pub fn rows_between(&self, doc: DocumentId, after: i64, before: i64) -> ArborResult<Vec<NodeRow>> {
        self.query_many(
            &format!(
                "SELECT {} FROM nodes WHERE doc_id = ?1 AND lft > ?2 AND lft < ?3
                 ORDER BY lft",
                NODE_COLUMNS
            ),
            params![doc.0, after, before],
        )
    }

    /// Immediate children of `node`, in sibling order
    ///
    /// A child is a descendant with no other descendant of `node` between
    /// them.
    pub fn children(&self, doc: DocumentId, node: &NodeRow) -> ArborResult<Vec<NodeRow>> {
        self.query_many(
            &format!(
                "SELECT {} FROM nodes c WHERE c.doc_id = ?1 AND c.lft > ?2 AND c.rgt < ?3
                 AND NOT EXISTS (
                     SELECT 1 FROM nodes m WHERE m.doc_id = ?1
                     AND m.lft > ?2 AND m.rgt < ?3
                     AND m.lft < c.lft AND m.rgt > c.rgt
                 )
                 ORDER BY c.lft",
                NODE_COLUMNS
            ),
            params![doc.0, node.lft, node.rgt],
        )
    }

    /// Number of immediate children of `node`
    pub fn count_children(&self, doc: DocumentId, node: &NodeRow) -> ArborResult<u64> {
        if node.is_leaf() {
            return Ok(0);
        }
        let mut stmt = self
            .conn
            .prepare_cached(
                "SELECT COUNT(*) FROM nodes c WHERE c.doc_id = ?1 AND c.lft > ?2 AND c.rgt < ?3
                 AND NOT EXISTS (
                     SELECT 1 FROM nodes m WHERE m.doc_id = ?1
                     AND m.lft > ?2 AND m.rgt < ?3
                     AND m.lft < c.lft AND m.rgt > c.rgt
                 )",
            )
            .map_err(sql_err)?;
        let count: i64 = stmt
            .query_row(params![doc.0, node.lft, node.rgt], |row| row.get(0))
            .map_err(sql_err)?;
        Ok(count as u64)
    }

    /// Every row of a document, in depth-first order
    pub fn all_nodes(&self, doc: DocumentId) -> ArborResult<Vec<NodeRow>> {
        self.query_many(
            &format!(
                "SELECT {} FROM nodes WHERE doc_id = ?1 ORDER BY lft",
                NODE_COLUMNS
            ),
            params![doc.0],
        )
    }

    /// Number of rows in a document
    pub fn node_count(&self, doc: DocumentId) -> ArborResult<u64> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT COUNT(*) FROM nodes WHERE doc_id = ?1")
            .map_err(sql_err)?;
        let count: i64 = stmt
            .query_row(params![doc.0], |row| row.get(0))
            .map_err(sql_err)?;
        Ok(count as u64)
    }

    // ========================================================================
    // Row mutation
    // ========================================================================

    /// Insert a single row
    ///
    /// Fails with `AlreadyExists` if `full_path` is taken in this document.
    #[allow(clippy::too_many_arguments)]
    pub fn insert(
        &self,
        doc: DocumentId,
        full_path: &str,
        leaf_name: &str,
        node_type: NodeType,
        value: Option<&str>,
        lft: i64,
        rgt: i64,
    ) -> ArborResult<NodeRow> {
        let mut stmt = self
            .conn
            .prepare_cached(
                "INSERT INTO nodes (doc_id, full_path, leaf_name, type, value, lft, rgt)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .map_err(sql_err)?;
        match stmt.execute(params![
            doc.0,
            full_path,
            leaf_name,
            node_type.code(),
            value,
            lft,
            rgt
        ]) {
            Ok(_) => Ok(NodeRow {
                id: self.conn.last_insert_rowid(),
                full_path: full_path.to_string(),
                leaf_name: leaf_name.to_string(),
                node_type,
                value: value.map(str::to_string),
                lft,
                rgt,
            }),
            Err(e) if is_unique_violation(&e) => Err(ArborError::already_exists(full_path)),
            Err(e) => Err(sql_err(e)),
        }
    }

    /// Replace a row's type and payload, leaving its bounds alone
    pub fn set_payload(
        &self,
        node_id: i64,
        node_type: NodeType,
        value: Option<&str>,
    ) -> ArborResult<()> {
        self.conn
            .prepare_cached("UPDATE nodes SET type = ?2, value = ?3 WHERE id = ?1")
            .and_then(|mut stmt| stmt.execute(params![node_id, node_type.code(), value]))
            .map_err(sql_err)?;
        Ok(())
    }

    /// Rewrite a row's path and leaf name
    pub fn rename(&self, node_id: i64, full_path: &str, leaf_name: &str) -> ArborResult<()> {
        let mut stmt = self
            .conn
            .prepare_cached("UPDATE nodes SET full_path = ?2, leaf_name = ?3 WHERE id = ?1")
            .map_err(sql_err)?;
        match stmt.execute(params![node_id, full_path, leaf_name]) {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(ArborError::already_exists(full_path)),
            Err(e) => Err(sql_err(e)),
        }
    }

    /// Delete `node` and every row inside it
    pub fn delete_subtree(&self, doc: DocumentId, node: &NodeRow) -> ArborResult<usize> {
        self.conn
            .prepare_cached("DELETE FROM nodes WHERE doc_id = ?1 AND lft >= ?2 AND rgt <= ?3")
            .and_then(|mut stmt| stmt.execute(params![doc.0, node.lft, node.rgt]))
            .map_err(sql_err)
    }

    /// Delete every row strictly inside `node`
    pub fn delete_descendants(&self, doc: DocumentId, node: &NodeRow) -> ArborResult<usize> {
        self.conn
            .prepare_cached("DELETE FROM nodes WHERE doc_id = ?1 AND lft > ?2 AND rgt < ?3")
            .and_then(|mut stmt| stmt.execute(params![doc.0, node.lft, node.rgt]))
            .map_err(sql_err)
    }

    // ========================================================================
    // Bound maintenance
    // ========================================================================

    /// Open `width` bound slots starting at `at`
    ///
    /// Right bounds `>= at` and left bounds `> at` move up by `width`. With
    /// `at` set to a parent's right bound, the slots `at..at + width` become
    /// free directly after the parent's last child.
    pub fn open_gap(&self, doc: DocumentId, at: i64, width: i64) -> ArborResult<()> {
        self.conn
            .prepare_cached("UPDATE nodes SET rgt = rgt + ?3 WHERE doc_id = ?1 AND rgt >= ?2")
            .and_then(|mut stmt| stmt.execute(params![doc.0, at, width]))
            .map_err(sql_err)?;
        self.conn
            .prepare_cached("UPDATE nodes SET lft = lft + ?3 WHERE doc_id = ?1 AND lft > ?2")
            .and_then(|mut stmt| stmt.execute(params![doc.0, at, width]))
            .map_err(sql_err)?;
        Ok(())
    }

    /// Close a gap of `width` slots left after bound `after`
    ///
    /// Left and right bounds `> after` move down by `width`.
    pub fn close_gap(&self, doc: DocumentId, after: i64, width: i64) -> ArborResult<()> {
        if width == 0 {
            return Ok(());
        }
        self.conn
            .prepare_cached("UPDATE nodes SET lft = lft - ?3 WHERE doc_id = ?1 AND lft > ?2")
            .and_then(|mut stmt| stmt.execute(params![doc.0, after, width]))
            .map_err(sql_err)?;
        self.conn
            .prepare_cached("UPDATE nodes SET rgt = rgt - ?3 WHERE doc_id = ?1 AND rgt > ?2")
            .and_then(|mut stmt| stmt.execute(params![doc.0, after, width]))
            .map_err(sql_err)?;
        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn query_one<P: rusqlite::Params>(&self, sql: &str, params: P) -> ArborResult<Option<NodeRow>> {
        let mut stmt = self.conn.prepare_cached(sql).map_err(sql_err)?;
        stmt.query_row(params, NodeRow::from_row)
            .optional()
            .map_err(sql_err)
    }

    fn query_many<P: rusqlite::Params>(&self, sql: &str, params: P) -> ArborResult<Vec<NodeRow>> {
        let mut stmt = self.conn.prepare_cached(sql).map_err(sql_err)?;
        let rows = stmt.query_map(params, NodeRow::from_row).map_err(sql_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
    }
}
