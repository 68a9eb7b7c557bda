//! Node id generation.
//!
//! Ids are decimal strings seeded from wall-clock milliseconds and strictly
//! increasing afterwards, so two nodes created in the same millisecond still
//! get distinct ids.

use super::query::find_node_by_id;
use super::types::{HierarchyNode, PLACEHOLDER_NAME, PLACEHOLDER_TITLE};

/// Milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Milliseconds since the Unix epoch.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn starting_at(seed: u64) -> Self {
        Self { next: seed }
    }

    pub fn from_clock() -> Self {
        Self::starting_at(now_ms())
    }

    pub fn next_id(&mut self) -> String {
        let id = self.next;
        self.next = id.saturating_add(1);
        id.to_string()
    }

    /// Next id that does not already occur in `tree`.
    pub fn next_id_for(&mut self, tree: &HierarchyNode) -> String {
        loop {
            let id = self.next_id();
            if find_node_by_id(tree, &id).is_none() {
                return id;
            }
        }
    }

    /// A new leaf with placeholder name and title.
    pub fn create_node(&mut self) -> HierarchyNode {
        HierarchyNode::new(self.next_id(), PLACEHOLDER_NAME, PLACEHOLDER_TITLE)
    }

    /// Like `create_node`, but guaranteed not to collide with any id in `tree`.
    pub fn create_node_for(&mut self, tree: &HierarchyNode) -> HierarchyNode {
        HierarchyNode::new(self.next_id_for(tree), PLACEHOLDER_NAME, PLACEHOLDER_TITLE)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::from_clock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::types::sample_hierarchy;

    #[test]
    fn test_ids_strictly_increase() {
        let mut ids = IdGenerator::starting_at(100);
        assert_eq!(ids.next_id(), "100");
        assert_eq!(ids.next_id(), "101");
        assert_eq!(ids.next_id(), "102");
    }

    #[test]
    fn test_next_id_skips_ids_in_tree() {
        // Sample tree uses ids "1".."7".
        let tree = sample_hierarchy();
        let mut ids = IdGenerator::starting_at(3);
        assert_eq!(ids.next_id_for(&tree), "8");
    }

    #[test]
    fn test_create_node_uses_placeholders() {
        let mut ids = IdGenerator::starting_at(42);
        let node = ids.create_node();
        assert_eq!(node.id, "42");
        assert_eq!(node.name, PLACEHOLDER_NAME);
        assert_eq!(node.title, PLACEHOLDER_TITLE);
        assert!(node.children.is_empty());
    }
}
