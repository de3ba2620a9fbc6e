//! Structural check of a stored document
//!
//! Walks every row of a document once, in left-bound order, and reports the
//! first broken invariant as `Corruption`:
//!
//! - the root sits at `lft == 1` with path `/`, and its `rgt` is twice the row count
//! - the bounds of all rows are exactly `1..=2n`, each used once
//! - every non-root row nests inside a container and its path extends the parent's
//! - array children are named `0, 1, 2, ...` in sibling order
//! - scalar and null rows have no children

use arbor_core::path::{array_index, join};
use arbor_core::{ArborError, ArborResult, NodeType, ROOT_LEAF, ROOT_PATH};
use arbor_storage::{DocumentId, NodeRow, NodeStore};

struct Open {
    row: NodeRow,
    children: u64,
}

/// Check every stored invariant of `doc`
pub(crate) fn verify(store: &NodeStore<'_>, doc: DocumentId) -> ArborResult<()> {
    let rows = store.all_nodes(doc)?;
    check_rows(rows)
}

fn check_rows(rows: Vec<NodeRow>) -> ArborResult<()> {
    let count = rows.len() as i64;
    let root = rows
        .first()
        .ok_or_else(|| ArborError::corruption("document has no root node"))?;
    if root.lft != 1 || root.full_path != ROOT_PATH || root.leaf_name != ROOT_LEAF {
        return Err(ArborError::corruption(format!(
            "first row '{}' at {} is not the document root",
            root.full_path, root.lft
        )));
    }
    if root.rgt != 2 * count {
        return Err(ArborError::corruption(format!(
            "root right bound {} does not match {} rows",
            root.rgt, count
        )));
    }

    let mut bounds: Vec<i64> = rows.iter().flat_map(|r| [r.lft, r.rgt]).collect();
    bounds.sort_unstable();
    if let Some((expected, found)) = (1..).zip(bounds.iter()).find(|(e, f)| e != *f) {
        return Err(ArborError::corruption(format!(
            "bound {} is missing or reused (found {})",
            expected, found
        )));
    }

    let mut stack: Vec<Open> = Vec::new();
    for row in rows {
        if row.rgt <= row.lft {
            return Err(ArborError::corruption(format!(
                "'{}' has bounds {}..{}",
                row.full_path, row.lft, row.rgt
            )));
        }
        if !row.node_type.is_container() && !row.is_leaf() {
            return Err(ArborError::corruption(format!(
                "{} node '{}' has children",
                row.node_type, row.full_path
            )));
        }

        while stack.last().map_or(false, |top| top.row.rgt < row.lft) {
            stack.pop();
        }
        if let Some(parent) = stack.last_mut() {
            check_child(parent, &row)?;
        } else if row.lft != 1 {
            return Err(ArborError::corruption(format!(
                "'{}' lies outside the root",
                row.full_path
            )));
        }
        stack.push(Open { row, children: 0 });
    }
    Ok(())
}

fn check_child(parent: &mut Open, row: &NodeRow) -> ArborResult<()> {
    if !parent.row.contains(row) {
        return Err(ArborError::corruption(format!(
            "'{}' overlaps '{}'",
            row.full_path, parent.row.full_path
        )));
    }
    if row.leaf_name == ROOT_LEAF {
        return Err(ArborError::corruption(format!(
            "'{}' uses the reserved root name",
            row.full_path
        )));
    }
    let expected_path = join(&parent.row.full_path, &row.leaf_name);
    if row.full_path != expected_path {
        return Err(ArborError::corruption(format!(
            "'{}' should be '{}'",
            row.full_path, expected_path
        )));
    }
    if parent.row.node_type == NodeType::Array
        && array_index(&row.leaf_name) != Some(parent.children)
    {
        return Err(ArborError::corruption(format!(
            "'{}' should be element {} of '{}'",
            row.full_path, parent.children, parent.row.full_path
        )));
    }
    parent.children += 1;
    Ok(())
}
