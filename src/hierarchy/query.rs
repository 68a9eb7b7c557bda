//! Read-only lookups over a hierarchy.

use super::types::HierarchyNode;

/// Depth-first search for the node with `node_id`.
pub fn find_node_by_id<'a>(tree: &'a HierarchyNode, node_id: &str) -> Option<&'a HierarchyNode> {
    if tree.id == node_id {
        return Some(tree);
    }
    tree.children
        .iter()
        .find_map(|child| find_node_by_id(child, node_id))
}

/// Depth-first search for the parent of `node_id`. The root has no parent.
pub fn find_parent_node<'a>(tree: &'a HierarchyNode, node_id: &str) -> Option<&'a HierarchyNode> {
    if tree.children.iter().any(|c| c.id == node_id) {
        return Some(tree);
    }
    tree.children
        .iter()
        .find_map(|child| find_parent_node(child, node_id))
}

/// Total number of nodes, root included. Also the subtree size used by the compact layout.
pub fn count_nodes(tree: &HierarchyNode) -> usize {
    1 + tree.children.iter().map(count_nodes).sum::<usize>()
}

/// All ids in pre-order.
pub fn collect_ids(tree: &HierarchyNode) -> Vec<&str> {
    fn walk<'a>(node: &'a HierarchyNode, out: &mut Vec<&'a str>) {
        out.push(&node.id);
        for child in &node.children {
            walk(child, out);
        }
    }
    let mut out = Vec::new();
    walk(tree, &mut out);
    out
}

/// True if `candidate_id` lies strictly below `ancestor_id`.
pub fn is_descendant(tree: &HierarchyNode, ancestor_id: &str, candidate_id: &str) -> bool {
    find_node_by_id(tree, ancestor_id)
        .map(|ancestor| {
            ancestor
                .children
                .iter()
                .any(|child| find_node_by_id(child, candidate_id).is_some())
        })
        .unwrap_or(false)
}

/// First duplicated id in pre-order, if any.
pub fn first_duplicate_id(tree: &HierarchyNode) -> Option<&str> {
    let mut seen = std::collections::HashSet::new();
    collect_ids(tree).into_iter().find(|id| !seen.insert(*id))
}
