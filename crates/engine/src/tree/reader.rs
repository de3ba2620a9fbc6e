//! Tree reader: point lookups and subtree reconstruction

use arbor_core::{ArborError, ArborResult, JsonValue, NodeType, ParsedPath};
use arbor_storage::{DocumentId, NodeRow, NodeStore};
use smallvec::SmallVec;

/// Look up the node at `path`, failing with `NotFound` if absent
pub(crate) fn node(store: &NodeStore<'_>, doc: DocumentId, path: &ParsedPath) -> ArborResult<NodeRow> {
    store
        .lookup(doc, path.as_str())?
        .ok_or_else(|| ArborError::not_found(path.as_str()))
}

/// Value of a node: the scalar itself, or the rebuilt container
pub(crate) fn value(store: &NodeStore<'_>, doc: DocumentId, node: &NodeRow) -> ArborResult<JsonValue> {
    if node.node_type.is_container() {
        subtree(store, doc, node)
    } else {
        JsonValue::from_payload(node.node_type, node.value.as_deref())
    }
}

/// Rebuild the container rooted at `node` from one range query
pub(crate) fn subtree(store: &NodeStore<'_>, doc: DocumentId, node: &NodeRow) -> ArborResult<JsonValue> {
    let rows = store.descendants(doc, node)?;
    build(node, rows)
}

/// Open container during reconstruction
struct Frame {
    key: String,
    value: JsonValue,
    rgt: i64,
}

/// Turn depth-first rows back into nested containers
///
/// Rows arrive ordered by left bound. Each row is attached to the container
/// on top of the stack; a container row becomes the new top. Before a row is
/// placed, every container whose right bound lies before the row's left
/// bound is complete and is popped into its parent.
fn build(root: &NodeRow, rows: Vec<NodeRow>) -> ArborResult<JsonValue> {
    let value = JsonValue::empty_container(root.node_type).ok_or_else(|| {
        ArborError::type_mismatch(root.full_path.as_str(), NodeType::Object, root.node_type)
    })?;
    let mut stack: SmallVec<[Frame; 16]> = SmallVec::new();
    stack.push(Frame {
        key: String::new(),
        value,
        rgt: root.rgt,
    });

    for row in rows {
        while stack.last().map_or(false, |top| top.rgt < row.lft) {
            close_top(&mut stack)?;
        }
        let key = row.key();
        match JsonValue::empty_container(row.node_type) {
            Some(container) => stack.push(Frame {
                key,
                value: container,
                rgt: row.rgt,
            }),
            None => {
                let scalar = JsonValue::from_payload(row.node_type, row.value.as_deref())?;
                let top = stack.last_mut().ok_or_else(|| outside(root, &row))?;
                top.value.attach(key, scalar);
            }
        }
    }

    while stack.len() > 1 {
        close_top(&mut stack)?;
    }
    stack
        .pop()
        .map(|frame| frame.value)
        .ok_or_else(|| ArborError::corruption("reconstruction stack underflow"))
}

fn close_top(stack: &mut SmallVec<[Frame; 16]>) -> ArborResult<()> {
    if stack.len() < 2 {
        return Err(ArborError::corruption(
            "row lies outside the subtree being read",
        ));
    }
    if let Some(done) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.value.attach(done.key, done.value);
        }
    }
    Ok(())
}

fn outside(root: &NodeRow, row: &NodeRow) -> ArborError {
    ArborError::corruption(format!(
        "'{}' lies outside '{}'",
        row.full_path, root.full_path
    ))
}
