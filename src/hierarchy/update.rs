//! Structural edits on a hierarchy.
//!
//! Every function takes the tree by reference and returns a new tree; the input
//! is never touched. Unknown ids leave the result equal to the input.

use std::collections::HashSet;

use crate::error::MoveError;
use super::ids::IdGenerator;
use super::query::{find_node_by_id, is_descendant};
use super::types::HierarchyNode;

/// Append a fresh placeholder node as the last child of `parent_id`.
pub fn add_child(tree: &HierarchyNode, parent_id: &str, ids: &mut IdGenerator) -> HierarchyNode {
    if find_node_by_id(tree, parent_id).is_none() {
        return tree.clone();
    }
    let child = ids.create_node_for(tree);
    let mut out = tree.clone();
    if let Some(parent) = find_node_mut(&mut out, parent_id) {
        parent.children.push(child);
    }
    out
}

/// Remove `node_id` and its whole subtree. Deleting the root is a no-op.
pub fn delete_node(tree: &HierarchyNode, node_id: &str) -> HierarchyNode {
    let mut out = tree.clone();
    if out.id != node_id {
        detach(&mut out.children, node_id);
    }
    out
}

/// Replace name and title of `node_id`, keeping its children.
pub fn update_node(tree: &HierarchyNode, node_id: &str, name: &str, title: &str) -> HierarchyNode {
    let mut out = tree.clone();
    if let Some(node) = find_node_mut(&mut out, node_id) {
        node.name = name.to_string();
        node.title = title.to_string();
    }
    out
}

/// Set `new_title` on every node whose id is listed. Single pass over the tree.
pub fn bulk_update_titles<S: AsRef<str>>(
    tree: &HierarchyNode,
    node_ids: &[S],
    new_title: &str,
) -> HierarchyNode {
    let mut out = tree.clone();
    if node_ids.is_empty() {
        return out;
    }
    let wanted: HashSet<&str> = node_ids.iter().map(AsRef::as_ref).collect();
    set_titles_recursive(&mut out, &wanted, new_title);
    out
}

fn set_titles_recursive(node: &mut HierarchyNode, wanted: &HashSet<&str>, new_title: &str) {
    if wanted.contains(node.id.as_str()) {
        node.title = new_title.to_string();
    }
    for child in &mut node.children {
        set_titles_recursive(child, wanted, new_title);
    }
}

/// Re-parent `node_id` (with its subtree) as the last child of `new_parent_id`.
///
/// Both ids are validated before anything is detached, so a refused move never
/// loses nodes.
pub fn try_move_node(
    tree: &HierarchyNode,
    node_id: &str,
    new_parent_id: &str,
) -> Result<HierarchyNode, MoveError> {
    if node_id == new_parent_id {
        return Err(MoveError::SameNode);
    }
    if find_node_by_id(tree, node_id).is_none() {
        return Err(MoveError::UnknownNode(node_id.to_string()));
    }
    if find_node_by_id(tree, new_parent_id).is_none() {
        return Err(MoveError::UnknownParent(new_parent_id.to_string()));
    }
    // Also covers moving the root: every other node is its descendant.
    if is_descendant(tree, node_id, new_parent_id) {
        return Err(MoveError::IntoDescendant);
    }

    let mut out = tree.clone();
    let subtree = detach(&mut out.children, node_id)
        .ok_or_else(|| MoveError::UnknownNode(node_id.to_string()))?;
    let parent = find_node_mut(&mut out, new_parent_id)
        .ok_or_else(|| MoveError::UnknownParent(new_parent_id.to_string()))?;
    parent.children.push(subtree);
    Ok(out)
}

/// Total version of [`try_move_node`]: a refused move returns the tree unchanged.
pub fn move_node(tree: &HierarchyNode, node_id: &str, new_parent_id: &str) -> HierarchyNode {
    match try_move_node(tree, node_id, new_parent_id) {
        Ok(out) => out,
        Err(e) => {
            tracing::debug!(node_id, new_parent_id, error = %e, "move refused");
            tree.clone()
        }
    }
}

/// Recursively search for a node by ID, mutably.
fn find_node_mut<'a>(node: &'a mut HierarchyNode, node_id: &str) -> Option<&'a mut HierarchyNode> {
    if node.id == node_id {
        return Some(node);
    }
    node.children
        .iter_mut()
        .find_map(|child| find_node_mut(child, node_id))
}

/// Remove the node with `node_id` from wherever it sits below `children`.
fn detach(children: &mut Vec<HierarchyNode>, node_id: &str) -> Option<HierarchyNode> {
    if let Some(idx) = children.iter().position(|c| c.id == node_id) {
        return Some(children.remove(idx));
    }
    children
        .iter_mut()
        .find_map(|child| detach(&mut child.children, node_id))
}
