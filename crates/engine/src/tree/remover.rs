//! Tree remover: subtree deletion, array renumbering and gap closure

use arbor_core::path::{array_index, join};
use arbor_core::{ArborError, ArborResult, NodeType, ParsedPath};
use arbor_storage::{DocumentId, NodeRow, NodeStore};
use tracing::debug;

/// Remove the node at `path` together with its subtree
///
/// When the parent is an array, every younger sibling moves down one index
/// and the paths of their descendants follow.
pub(crate) fn remove(store: &NodeStore<'_>, doc: DocumentId, path: &ParsedPath) -> ArborResult<()> {
    if path.is_root() {
        return Err(ArborError::invalid_path(
            path.as_str(),
            "the document root cannot be removed",
        ));
    }
    let node = store
        .lookup(doc, path.as_str())?
        .ok_or_else(|| ArborError::not_found(path.as_str()))?;
    let parent = store.parent_of(doc, &node)?.ok_or_else(|| {
        ArborError::corruption(format!("node '{}' has no enclosing node", node.full_path))
    })?;

    let removed = store.delete_subtree(doc, &node)?;
    if parent.node_type == NodeType::Array {
        shift_younger_siblings(store, doc, &node, &parent)?;
    }
    store.close_gap(doc, node.lft, node.rgt - node.lft + 1)?;

    debug!(target: "arbor::tree", doc = %doc, path = %node.full_path, rows = removed, "removed subtree");
    Ok(())
}

/// Remove every node strictly inside `node`, keeping `node` itself
///
/// `node.rgt` is updated to reflect the closed gap.
pub(crate) fn remove_descendants(
    store: &NodeStore<'_>,
    doc: DocumentId,
    node: &mut NodeRow,
) -> ArborResult<()> {
    let width = node.rgt - node.lft - 1;
    if width == 0 {
        return Ok(());
    }
    let removed = store.delete_descendants(doc, node)?;
    store.close_gap(doc, node.lft, width)?;
    node.rgt = node.lft + 1;
    debug!(target: "arbor::tree", doc = %doc, path = %node.full_path, rows = removed, "removed descendants");
    Ok(())
}

/// Renumber the siblings after `removed` in `array`
///
/// Runs after the removed subtree is deleted but before its gap is closed,
/// so the younger rows still sit between `removed.rgt` and `array.rgt`.
/// Rows are visited in left-bound order: a row starting right after the
/// previous sibling's right bound is the next sibling, anything else
/// belongs to the current sibling's subtree. Renaming in that order frees
/// each target path before it is reused.
fn shift_younger_siblings(
    store: &NodeStore<'_>,
    doc: DocumentId,
    removed: &NodeRow,
    array: &NodeRow,
) -> ArborResult<()> {
    let rows = store.rows_between(doc, removed.rgt, array.rgt)?;
    let mut next_sibling_lft = removed.rgt + 1;
    let mut moved: Option<(String, String)> = None;

    for row in rows {
        if row.lft == next_sibling_lft {
            let index = array_index(&row.leaf_name)
                .filter(|i| *i > 0)
                .ok_or_else(|| {
                    ArborError::corruption(format!(
                        "array element '{}' has an invalid index",
                        row.full_path
                    ))
                })?;
            let leaf = (index - 1).to_string();
            let new_path = join(&array.full_path, &leaf);
            store.rename(row.id, &new_path, &leaf)?;
            next_sibling_lft = row.rgt + 1;
            moved = Some((row.full_path, new_path));
        } else {
            let (old_prefix, new_prefix) = moved.as_ref().ok_or_else(|| {
                ArborError::corruption(format!("'{}' is not inside an array element", row.full_path))
            })?;
            let rest = row
                .full_path
                .strip_prefix(old_prefix.as_str())
                .filter(|rest| rest.starts_with('/'))
                .ok_or_else(|| {
                    ArborError::corruption(format!(
                        "'{}' does not extend '{}'",
                        row.full_path, old_prefix
                    ))
                })?;
            let new_path = format!("{}{}", new_prefix, rest);
            store.rename(row.id, &new_path, &row.leaf_name)?;
        }
    }
    Ok(())
}
