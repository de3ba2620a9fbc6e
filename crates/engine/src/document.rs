//! Document handle: path operations scoped to one document
//!
//! A [`Document`] holds the database handle and the resolved document id.
//! Every method parses its path, opens one transaction (write or read) and
//! runs the tree algorithms inside it, so each call is atomic on its own.
//!
//! # Example
//!
//! ```text
//! let doc = db.create_document("settings")?;
//! doc.add("/config", json!({}), false)?;
//! doc.add("/config/name", json!("alice"), false)?;
//! assert_eq!(doc.get_string("/config/name")?, "alice");
//! assert_eq!(doc.count("/config")?, 1);
//!
//! doc.add("/list", json!([]), false)?;
//! doc.add("/list/#", json!(10), false)?;   // returns "/list/0"
//! ```

use crate::database::Database;
use crate::tree::{reader, remover, verify, writer};
use arbor_core::{ArborError, ArborResult, JsonValue, NodeType, ParsedPath};
use arbor_storage::DocumentId;
use std::sync::Arc;

/// Handle to one named document
#[derive(Clone)]
pub struct Document {
    db: Arc<Database>,
    id: DocumentId,
    name: String,
}

impl Document {
    pub(crate) fn new(db: Arc<Database>, id: DocumentId, name: &str) -> Self {
        Self {
            db,
            id,
            name: name.to_string(),
        }
    }

    /// Registry id of this document
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Name this document was opened under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Database this document lives in
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Insert `value` at `path`
    ///
    /// Containers are stored together with all their children. A trailing
    /// `#` appends to an existing array. With `recursive`, missing ancestors
    /// are created (as an array if the leaf is `#`, otherwise as objects).
    ///
    /// Returns the stored path, which differs from `path` when `#` was
    /// resolved to an index.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if the path is occupied
    /// - `ParentMissing` if the parent is absent and `recursive` is false
    /// - `NonContainerAncestor` if the parent is a scalar or null
    /// - `InvalidPath` for malformed paths, `#` under an object, or a
    ///   numeric leaf under an array
    /// - `LimitExceeded` if the value nests deeper than configured
    pub fn add(&self, path: &str, value: impl Into<JsonValue>, recursive: bool) -> ArborResult<String> {
        let path = ParsedPath::parse(path)?;
        let value = self.checked(value.into())?;
        let row = self
            .db
            .transaction(|store| writer::insert_value(store, self.id, &path, &value, recursive))?;
        Ok(row.full_path)
    }

    /// Replace the value at `path`, or insert it if the path is absent
    ///
    /// An existing node keeps its position among its siblings; its old
    /// children are dropped before the new ones are stored.
    pub fn update(&self, path: &str, value: impl Into<JsonValue>, recursive: bool) -> ArborResult<String> {
        let path = ParsedPath::parse(path)?;
        let value = self.checked(value.into())?;
        let row = self
            .db
            .transaction(|store| writer::update_value(store, self.id, &path, &value, recursive))?;
        Ok(row.full_path)
    }

    /// Remove the node at `path` and everything beneath it
    ///
    /// Removing an array element shifts every later element down by one.
    /// The root cannot be removed; use [`Document::clear`] instead.
    pub fn remove(&self, path: &str) -> ArborResult<()> {
        let path = ParsedPath::parse(path)?;
        self.db
            .transaction(|store| remover::remove(store, self.id, &path))
    }

    /// Remove every node except the root
    pub fn clear(&self) -> ArborResult<()> {
        let root = ParsedPath::root();
        self.db.transaction(|store| {
            let mut node = reader::node(store, self.id, &root)?;
            remover::remove_descendants(store, self.id, &mut node)
        })
    }

    /// Delete this document from the registry
    pub fn remove_document(self) -> ArborResult<()> {
        self.db.remove_document_by_id(self.id, &self.name)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Value at `path`: a scalar, or the whole subtree for a container
    pub fn get(&self, path: &str) -> ArborResult<JsonValue> {
        let path = ParsedPath::parse(path)?;
        self.db.read(|store| {
            let node = reader::node(store, self.id, &path)?;
            reader::value(store, self.id, &node)
        })
    }

    /// Rebuild the object or array at `path`
    ///
    /// Fails with `TypeMismatch` if the node is a scalar.
    pub fn get_subtree(&self, path: &str) -> ArborResult<JsonValue> {
        let path = ParsedPath::parse(path)?;
        self.db.read(|store| {
            let node = reader::node(store, self.id, &path)?;
            reader::subtree(store, self.id, &node)
        })
    }

    /// Value at `path`, checked against `expected`
    ///
    /// Integers may be read as doubles; every other mismatch fails with
    /// `TypeMismatch`.
    pub fn get_as(&self, path: &str, expected: NodeType) -> ArborResult<JsonValue> {
        let path = ParsedPath::parse(path)?;
        self.db.read(|store| {
            let node = reader::node(store, self.id, &path)?;
            if !node.node_type.satisfies(expected) {
                return Err(ArborError::type_mismatch(
                    node.full_path,
                    expected,
                    node.node_type,
                ));
            }
            if expected.is_container() {
                reader::subtree(store, self.id, &node)
            } else {
                JsonValue::from_payload(expected, node.value.as_deref())
            }
        })
    }

    /// Integer at `path`
    pub fn get_int(&self, path: &str) -> ArborResult<i64> {
        let value = self.get_as(path, NodeType::Int64)?;
        value
            .as_i64()
            .ok_or_else(|| ArborError::corruption(format!("'{}' is not an int64", path)))
    }

    /// Number at `path` as a double; integers widen
    pub fn get_double(&self, path: &str) -> ArborResult<f64> {
        let value = self.get_as(path, NodeType::Double)?;
        value
            .as_f64()
            .ok_or_else(|| ArborError::corruption(format!("'{}' is not a double", path)))
    }

    /// Boolean at `path`
    pub fn get_bool(&self, path: &str) -> ArborResult<bool> {
        let value = self.get_as(path, NodeType::Bool)?;
        value
            .as_bool()
            .ok_or_else(|| ArborError::corruption(format!("'{}' is not a bool", path)))
    }

    /// String at `path`
    pub fn get_string(&self, path: &str) -> ArborResult<String> {
        match self.get_as(path, NodeType::String)?.into_inner() {
            serde_json::Value::String(s) => Ok(s),
            _ => Err(ArborError::corruption(format!("'{}' is not a string", path))),
        }
    }

    /// True if a node exists at `path`
    ///
    /// Malformed and absent paths both report `false`; only store failures
    /// are errors.
    pub fn has(&self, path: &str) -> ArborResult<bool> {
        let path = match ParsedPath::parse(path) {
            Ok(path) => path,
            Err(_) => return Ok(false),
        };
        let found = self.db.read(|store| store.lookup(self.id, path.as_str()))?;
        Ok(found.is_some())
    }

    /// Stored type of the node at `path`
    pub fn type_of(&self, path: &str) -> ArborResult<NodeType> {
        let path = ParsedPath::parse(path)?;
        let node = self.db.read(|store| reader::node(store, self.id, &path))?;
        Ok(node.node_type)
    }

    /// Number of immediate children of the node at `path`; 0 for scalars
    pub fn count(&self, path: &str) -> ArborResult<u64> {
        let path = ParsedPath::parse(path)?;
        self.db.read(|store| {
            let node = reader::node(store, self.id, &path)?;
            store.count_children(self.id, &node)
        })
    }

    /// Unescaped names of the immediate children of `path`, in order
    pub fn keys(&self, path: &str) -> ArborResult<Vec<String>> {
        let path = ParsedPath::parse(path)?;
        self.db.read(|store| {
            let node = reader::node(store, self.id, &path)?;
            let children = store.children(self.id, &node)?;
            Ok(children.iter().map(|child| child.key()).collect())
        })
    }

    /// Total number of stored nodes, root included
    pub fn node_count(&self) -> ArborResult<u64> {
        self.db.read(|store| store.node_count(self.id))
    }

    /// Check the stored rows against every structural invariant
    ///
    /// Fails with `Corruption` naming the first violation found.
    pub fn verify(&self) -> ArborResult<()> {
        self.db.read(|store| verify::verify(store, self.id))
    }

    fn checked(&self, value: JsonValue) -> ArborResult<JsonValue> {
        value.validate(self.db.config().max_nesting_depth)?;
        Ok(value)
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}
