//! Tree writer: insert, append, ancestor creation and in-place update
//!
//! A new node always lands as the last child of its parent: the writer opens
//! two bound slots at the parent's right bound and inserts the row there.
//! Container values are then populated child by child, each child again
//! going to the end of its parent, so visitation order becomes sibling order.

use super::remover;
use arbor_core::path::{array_index, join};
use arbor_core::{
    escape, payload_of, ArborError, ArborResult, JsonValue, LimitError, NodeType, ParsedPath,
    MAX_PATH_LENGTH, ROOT_LEAF, ROOT_PATH,
};
use arbor_storage::{DocumentId, NodeRow, NodeStore};
use tracing::debug;

/// Insert a single node at `path`
///
/// With `recursive`, missing ancestors are created as objects (or as an
/// array when the leaf is `#`). With `allow_array_index`, an explicit numeric
/// leaf under an array parent is accepted if it is the next free index.
///
/// Returns the inserted row; its `full_path` carries the resolved index when
/// the leaf was `#`.
pub(crate) fn insert(
    store: &NodeStore<'_>,
    doc: DocumentId,
    path: &ParsedPath,
    node_type: NodeType,
    payload: Option<&str>,
    recursive: bool,
    allow_array_index: bool,
) -> ArborResult<NodeRow> {
    let parent_path = match path.parent() {
        Some(parent) => parent,
        None => return store.insert(doc, ROOT_PATH, ROOT_LEAF, node_type, payload, 1, 2),
    };

    let mut parent = match store.lookup(doc, parent_path)? {
        Some(parent) => parent,
        None if recursive => {
            let parent_type = if path.is_append() {
                NodeType::Array
            } else {
                NodeType::Object
            };
            let parsed = ParsedPath::parse(parent_path)?;
            insert(store, doc, &parsed, parent_type, None, true, true)?
        }
        None => return Err(ArborError::parent_missing(path.as_str())),
    };

    if !parent.node_type.is_container() {
        return Err(ArborError::non_container(parent.full_path));
    }

    let leaf = if path.is_append() {
        if parent.node_type != NodeType::Array {
            return Err(ArborError::invalid_path(
                path.as_str(),
                "'#' can only append to an array",
            ));
        }
        next_index(store, doc, &parent)?.to_string()
    } else if parent.node_type == NodeType::Array {
        if !allow_array_index {
            return Err(ArborError::invalid_path(
                path.as_str(),
                "array elements are added with '#'",
            ));
        }
        let expected = next_index(store, doc, &parent)?;
        match array_index(path.leaf()) {
            Some(index) if index == expected => path.leaf().to_string(),
            Some(index) if index < expected => {
                return Err(ArborError::already_exists(path.as_str()));
            }
            _ => {
                return Err(ArborError::invalid_path(
                    path.as_str(),
                    format!("next index of '{}' is {}", parent.full_path, expected),
                ));
            }
        }
    } else {
        path.leaf().to_string()
    };

    insert_child(store, doc, &mut parent, &leaf, node_type, payload)
}

/// Insert `value` at `path` and populate its children
pub(crate) fn insert_value(
    store: &NodeStore<'_>,
    doc: DocumentId,
    path: &ParsedPath,
    value: &JsonValue,
    recursive: bool,
) -> ArborResult<NodeRow> {
    let payload = value.scalar_payload()?;
    let mut row = insert(
        store,
        doc,
        path,
        value.node_type(),
        payload.as_deref(),
        recursive,
        false,
    )?;
    populate(store, doc, &mut row, path.depth(), value.as_inner())?;
    Ok(row)
}

/// Replace the value at `path`, or insert it if the path is absent
///
/// An existing node keeps its bounds, so its position among siblings (and
/// its array index) is unchanged. Its old descendants are removed first.
pub(crate) fn update_value(
    store: &NodeStore<'_>,
    doc: DocumentId,
    path: &ParsedPath,
    value: &JsonValue,
    recursive: bool,
) -> ArborResult<NodeRow> {
    let mut row = match store.lookup(doc, path.as_str())? {
        Some(row) => row,
        None => return insert_value(store, doc, path, value, recursive),
    };
    if path.is_root() && !value.node_type().is_container() {
        return Err(ArborError::invalid_value(format!(
            "the document root must stay a container, not {}",
            value.node_type()
        )));
    }

    remover::remove_descendants(store, doc, &mut row)?;

    let node_type = value.node_type();
    let payload = value.scalar_payload()?;
    store.set_payload(row.id, node_type, payload.as_deref())?;
    row.node_type = node_type;
    row.value = payload;
    debug!(target: "arbor::tree", doc = %doc, path = %row.full_path, %node_type, "updated node in place");

    populate(store, doc, &mut row, path.depth(), value.as_inner())?;
    Ok(row)
}

/// Insert the children of a container value under `node`
///
/// Object members keep their iteration order; array elements are numbered
/// 0, 1, 2, ... in order. `node.rgt` is kept current as children land.
/// `depth` is the segment count of `node`'s path; children deeper than
/// [`MAX_PATH_LENGTH`] would not be addressable and fail with `PathTooLong`.
pub(crate) fn populate(
    store: &NodeStore<'_>,
    doc: DocumentId,
    node: &mut NodeRow,
    depth: usize,
    value: &serde_json::Value,
) -> ArborResult<()> {
    match value {
        serde_json::Value::Object(members) => {
            for (key, child) in members {
                if key.is_empty() {
                    return Err(ArborError::invalid_path(
                        node.full_path.clone(),
                        "object keys must not be empty",
                    ));
                }
                if key == ROOT_LEAF {
                    return Err(ArborError::invalid_path(
                        join(&node.full_path, key),
                        format!("'{}' is a reserved key", ROOT_LEAF),
                    ));
                }
                insert_nested(store, doc, node, depth + 1, &escape(key), child)?;
            }
        }
        serde_json::Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                insert_nested(store, doc, node, depth + 1, &index.to_string(), child)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn insert_nested(
    store: &NodeStore<'_>,
    doc: DocumentId,
    parent: &mut NodeRow,
    depth: usize,
    leaf: &str,
    value: &serde_json::Value,
) -> ArborResult<()> {
    if depth > MAX_PATH_LENGTH {
        return Err(LimitError::PathTooLong {
            length: depth,
            max: MAX_PATH_LENGTH,
        }
        .into());
    }
    let node_type = NodeType::of(value);
    let payload = payload_of(value)?;
    let mut child = insert_child(store, doc, parent, leaf, node_type, payload.as_deref())?;
    if node_type.is_container() {
        populate(store, doc, &mut child, depth, value)?;
        // The child is the parent's last child, so it closes the parent.
        parent.rgt = child.rgt + 1;
    }
    Ok(())
}

/// Append a row as the last child of `parent`
fn insert_child(
    store: &NodeStore<'_>,
    doc: DocumentId,
    parent: &mut NodeRow,
    leaf: &str,
    node_type: NodeType,
    payload: Option<&str>,
) -> ArborResult<NodeRow> {
    let at = parent.rgt;
    let full_path = join(&parent.full_path, leaf);
    store.open_gap(doc, at, 2)?;
    let row = store.insert(doc, &full_path, leaf, node_type, payload, at, at + 1)?;
    parent.rgt += 2;
    debug!(target: "arbor::tree", doc = %doc, path = %row.full_path, lft = row.lft, "inserted node");
    Ok(row)
}

/// Index the next element appended to `array` will get
fn next_index(store: &NodeStore<'_>, doc: DocumentId, array: &NodeRow) -> ArborResult<u64> {
    match store.last_child(doc, array)? {
        None => Ok(0),
        Some(last) => array_index(&last.leaf_name).map(|i| i + 1).ok_or_else(|| {
            ArborError::corruption(format!(
                "array element '{}' has a non-numeric name",
                last.full_path
            ))
        }),
    }
}
