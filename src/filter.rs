//! Search and filter visibility.
//!
//! A node stays visible when it matches directly or when any descendant does,
//! so matches are always shown together with the path up to the root.

use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::hierarchy::{extract_department, HierarchyNode};

/// Deepest level bucket. Level 3 means "3 or deeper".
pub const MAX_LEVEL: usize = 3;

/// Level and department constraints. An empty set places no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub levels: BTreeSet<usize>,
    #[serde(default)]
    pub departments: BTreeSet<String>,
}

impl FilterOptions {
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty() && self.departments.is_empty()
    }

    /// Number of active constraints, as shown on the filter button badge.
    pub fn active_count(&self) -> usize {
        self.levels.len() + self.departments.len()
    }

    /// Add `level` if absent, remove it otherwise.
    pub fn toggle_level(&mut self, level: usize) {
        let level = level.min(MAX_LEVEL);
        if !self.levels.remove(&level) {
            self.levels.insert(level);
        }
    }

    pub fn toggle_department(&mut self, department: &str) {
        if !self.departments.remove(department) {
            self.departments.insert(department.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.levels.clear();
        self.departments.clear();
    }
}

/// True when either a query or a filter is in effect.
pub fn is_filter_active(query: &str, options: &FilterOptions) -> bool {
    !query.is_empty() || !options.is_empty()
}

/// Minimal sub-tree containing every matching node and its ancestors.
///
/// With no query and no filters the input is returned as-is (borrowed).
/// `None` means the root itself is not visible, i.e. nothing matched.
pub fn search_and_filter<'a>(
    tree: &'a HierarchyNode,
    query: &str,
    options: &FilterOptions,
) -> Option<Cow<'a, HierarchyNode>> {
    if !is_filter_active(query, options) {
        return Some(Cow::Borrowed(tree));
    }

    let needle = query.to_lowercase();
    let mut visible = HashSet::new();
    mark_visible(tree, 0, &needle, options, &mut visible);

    prune(tree, &visible).map(Cow::Owned)
}

fn matches_directly(node: &HierarchyNode, depth: usize, needle: &str, options: &FilterOptions) -> bool {
    let query_ok = needle.is_empty() || node.contains_lowercase(needle);
    let level_ok = options.levels.is_empty() || options.levels.contains(&depth.min(MAX_LEVEL));
    let dept_ok = options.departments.is_empty()
        || options.departments.contains(&extract_department(&node.title));
    query_ok && level_ok && dept_ok
}

/// Bottom-up pass: records every node that matches or has a matching descendant.
fn mark_visible<'a>(
    node: &'a HierarchyNode,
    depth: usize,
    needle: &str,
    options: &FilterOptions,
    visible: &mut HashSet<&'a str>,
) -> bool {
    // Visit every child; no short-circuit, siblings may match too.
    let mut any_child = false;
    for child in &node.children {
        any_child |= mark_visible(child, depth + 1, needle, options, visible);
    }
    let is_visible = any_child || matches_directly(node, depth, needle, options);
    if is_visible {
        visible.insert(node.id.as_str());
    }
    is_visible
}

/// Top-down pass: rebuild keeping only visible nodes.
fn prune(node: &HierarchyNode, visible: &HashSet<&str>) -> Option<HierarchyNode> {
    if !visible.contains(node.id.as_str()) {
        return None;
    }
    Some(HierarchyNode {
        id: node.id.clone(),
        name: node.name.clone(),
        title: node.title.clone(),
        children: node
            .children
            .iter()
            .filter_map(|child| prune(child, visible))
            .collect(),
    })
}
