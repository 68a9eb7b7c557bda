// Org chart layout engine.
//
// Projects a hierarchy into positioned nodes and parent -> child edges.
//
// Goals:
// - Pure: the tree is only read; callbacks are forwarded untouched
// - Deterministic: same tree + same kind => same coordinates
// - One depth-first descent per layout, emitting one node per tree node
//   and one edge per parent/child pair
//
// Algorithms (see algorithms/):
// - vertical: children centered below the parent
// - horizontal: children centered right of the parent
// - radial: children on arcs around the parent, root at the origin
// - compact: vertical with subtree-size weighted widths

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::hierarchy::HierarchyNode;

pub mod algorithms;

use algorithms::{CompactLayout, HorizontalLayout, RadialLayout, VerticalLayout};

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub const ORIGIN: PointF = PointF { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Edit entry points the rendering widget calls on a node.
pub trait NodeActions {
    fn edit(&self, node_id: &str, name: &str, title: &str);
    fn delete(&self, node_id: &str);
    fn add(&self, parent_id: &str);
}

struct NoActions;

impl NodeActions for NoActions {
    fn edit(&self, _node_id: &str, _name: &str, _title: &str) {}
    fn delete(&self, _node_id: &str) {}
    fn add(&self, _parent_id: &str) {}
}

/// Shared reference to a [`NodeActions`] implementation.
/// Cloning is a reference-count bump; every positioned node holds one.
#[derive(Clone)]
pub struct ActionsHandle(Rc<dyn NodeActions>);

impl ActionsHandle {
    pub fn new(actions: impl NodeActions + 'static) -> Self {
        Self(Rc::new(actions))
    }

    /// Handle whose callbacks do nothing.
    pub fn none() -> Self {
        Self::new(NoActions)
    }

    pub fn edit(&self, node_id: &str, name: &str, title: &str) {
        self.0.edit(node_id, name, title)
    }

    pub fn delete(&self, node_id: &str) {
        self.0.delete(node_id)
    }

    pub fn add(&self, parent_id: &str) {
        self.0.add(parent_id)
    }

    pub fn ptr_eq(&self, other: &ActionsHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ActionsHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActionsHandle")
    }
}

/// A node with its computed position.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNode {
    pub id: String,
    pub position: PointF,
    /// Depth below the layout root (root = starting level, usually 0).
    pub level: usize,
    /// `None` when no search query is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches_search: Option<bool>,
    pub name: String,
    pub title: String,
    #[serde(skip)]
    pub actions: ActionsHandle,
}

/// Parent -> child connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionedEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl PositionedEdge {
    /// Edge id is `e-{parent}-{child}`; `-` and `\` inside ids are escaped with `\`
    /// so distinct pairs never share an id.
    pub fn between(parent_id: &str, child_id: &str) -> Self {
        Self {
            id: format!("e-{}-{}", escape_edge_part(parent_id), escape_edge_part(child_id)),
            source: parent_id.to_string(),
            target: child_id.to_string(),
        }
    }
}

fn escape_edge_part(id: &str) -> Cow<'_, str> {
    if !id.contains(['-', '\\']) {
        return Cow::Borrowed(id);
    }
    let mut out = String::with_capacity(id.len() + 2);
    for c in id.chars() {
        if c == '-' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    Cow::Owned(out)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LayoutResult {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<PositionedEdge>,
}

impl LayoutResult {
    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Vertical: horizontal distance between siblings.
    pub vertical_sibling_spacing: f64,
    /// Vertical: distance between levels.
    pub vertical_level_spacing: f64,
    /// Horizontal: vertical distance between siblings.
    pub horizontal_sibling_spacing: f64,
    /// Horizontal: distance between levels.
    pub horizontal_level_spacing: f64,
    /// Radial: a child at level `n` sits `n * radial_ring_spacing` from its parent.
    pub radial_ring_spacing: f64,
    /// Compact: width allotted per node of a child's subtree.
    pub compact_unit_width: f64,
    pub compact_level_spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            vertical_sibling_spacing: 250.0,
            vertical_level_spacing: 150.0,
            horizontal_sibling_spacing: 150.0,
            horizontal_level_spacing: 300.0,
            radial_ring_spacing: 200.0,
            compact_unit_width: 180.0,
            compact_level_spacing: 100.0,
        }
    }
}

/// Which algorithm to run.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    Vertical,
    Horizontal,
    Radial,
    Compact,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 4] = [
        LayoutKind::Vertical,
        LayoutKind::Horizontal,
        LayoutKind::Radial,
        LayoutKind::Compact,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutKind::Vertical => "vertical",
            LayoutKind::Horizontal => "horizontal",
            LayoutKind::Radial => "radial",
            LayoutKind::Compact => "compact",
        }
    }

    fn strategy(self) -> &'static dyn LayoutStrategy {
        match self {
            LayoutKind::Vertical => &VerticalLayout,
            LayoutKind::Horizontal => &HorizontalLayout,
            LayoutKind::Radial => &RadialLayout,
            LayoutKind::Compact => &CompactLayout,
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayoutKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown layout '{}'", s))
    }
}

/// Per-call state shared by every algorithm: the callbacks to forward and the
/// lowercased search query used for highlighting.
pub struct LayoutContext<'a> {
    actions: &'a ActionsHandle,
    needle: String,
}

impl<'a> LayoutContext<'a> {
    pub fn new(actions: &'a ActionsHandle, search_query: &str) -> Self {
        Self { actions, needle: search_query.to_lowercase() }
    }

    fn matches_search(&self, node: &HierarchyNode) -> Option<bool> {
        if self.needle.is_empty() {
            None
        } else {
            Some(node.contains_lowercase(&self.needle))
        }
    }

    /// Push the positioned copy of `node`.
    pub(crate) fn emit(&self, out: &mut LayoutResult, node: &HierarchyNode, position: PointF, level: usize) {
        out.nodes.push(PositionedNode {
            id: node.id.clone(),
            position,
            level,
            matches_search: self.matches_search(node),
            name: node.name.clone(),
            title: node.title.clone(),
            actions: self.actions.clone(),
        });
    }

    /// Push the edge `parent -> child`.
    pub(crate) fn connect(&self, out: &mut LayoutResult, parent: &HierarchyNode, child: &HierarchyNode) {
        out.edges.push(PositionedEdge::between(&parent.id, &child.id));
    }
}

/// Common interface of the four algorithms.
pub trait LayoutStrategy {
    fn layout(
        &self,
        tree: &HierarchyNode,
        origin: PointF,
        level: usize,
        ctx: &LayoutContext<'_>,
        cfg: &LayoutConfig,
    ) -> LayoutResult;
}

/// Lay out `tree` with the selected algorithm.
///
/// `origin` and `level` describe where the root goes and what depth it has.
/// The radial layout always centers its root on (0, 0).
pub fn layout_hierarchy(
    tree: &HierarchyNode,
    kind: LayoutKind,
    actions: &ActionsHandle,
    origin: PointF,
    level: usize,
    search_query: &str,
    cfg: &LayoutConfig,
) -> LayoutResult {
    let ctx = LayoutContext::new(actions, search_query);
    kind.strategy().layout(tree, origin, level, &ctx, cfg)
}

/// Offsets of `count` items spaced `spacing` apart and centered on 0.
pub(crate) fn centered_offsets(count: usize, spacing: f64) -> impl Iterator<Item = f64> {
    let width = count.saturating_sub(1) as f64 * spacing;
    (0..count).map(move |i| -width / 2.0 + i as f64 * spacing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::testing::arb_tree;
    use crate::hierarchy::{count_nodes, sample_hierarchy};
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::collections::HashSet;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
    }

    impl NodeActions for Rc<Recorder> {
        fn edit(&self, node_id: &str, name: &str, title: &str) {
            self.calls.borrow_mut().push(format!("edit {} {} {}", node_id, name, title));
        }
        fn delete(&self, node_id: &str) {
            self.calls.borrow_mut().push(format!("delete {}", node_id));
        }
        fn add(&self, parent_id: &str) {
            self.calls.borrow_mut().push(format!("add {}", parent_id));
        }
    }

    #[test]
    fn test_layout_kind_roundtrip_str() {
        for kind in LayoutKind::ALL {
            assert_eq!(kind.as_str().parse::<LayoutKind>(), Ok(kind));
        }
        assert!("diagonal".parse::<LayoutKind>().is_err());
        assert_eq!(LayoutKind::default(), LayoutKind::Vertical);
    }

    #[test]
    fn test_centered_offsets() {
        let xs: Vec<f64> = centered_offsets(3, 250.0).collect();
        assert_eq!(xs, vec![-250.0, 0.0, 250.0]);
        let xs: Vec<f64> = centered_offsets(2, 150.0).collect();
        assert_eq!(xs, vec![-75.0, 75.0]);
        assert_eq!(centered_offsets(0, 10.0).count(), 0);
    }

    #[test]
    fn test_edge_ids_follow_parent_child() {
        let tree = sample_hierarchy();
        let out = layout_hierarchy(
            &tree,
            LayoutKind::Vertical,
            &ActionsHandle::none(),
            PointF::ORIGIN,
            0,
            "",
            &LayoutConfig::default(),
        );
        assert_eq!(out.edges[0], PositionedEdge::between("1", "2"));
        assert_eq!(out.edges[0].id, "e-1-2");
        assert!(out.edges.iter().any(|e| e.id == "e-3-7" && e.source == "3" && e.target == "7"));
    }

    #[test]
    fn test_edge_ids_distinct_when_ids_contain_dashes() {
        let a = PositionedEdge::between("a-b", "c");
        let b = PositionedEdge::between("a", "b-c");
        assert_ne!(a.id, b.id);
        assert_eq!(a.id, "e-a\\-b-c");
        assert_eq!(b.id, "e-a-b\\-c");
        assert_ne!(
            PositionedEdge::between("a\\", "b").id,
            PositionedEdge::between("a", "\\b").id
        );

        let tree = HierarchyNode::new("r", "R", "社長").with_children(vec![
            HierarchyNode::new("a-b", "AB", "部長").with_children(vec![HierarchyNode::new("c", "C", "課長")]),
            HierarchyNode::new("a", "A", "部長").with_children(vec![HierarchyNode::new("b-c", "BC", "課長")]),
        ]);
        for kind in LayoutKind::ALL {
            let out = layout_hierarchy(
                &tree,
                kind,
                &ActionsHandle::none(),
                PointF::ORIGIN,
                0,
                "",
                &LayoutConfig::default(),
            );
            let ids: HashSet<&str> = out.edges.iter().map(|e| e.id.as_str()).collect();
            assert_eq!(ids.len(), out.edges.len(), "{:?}", kind);
        }
    }

    #[test]
    fn test_callbacks_are_forwarded() {
        let recorder = Rc::new(Recorder::default());
        let handle = ActionsHandle::new(recorder.clone());
        let tree = sample_hierarchy();
        let out = layout_hierarchy(
            &tree,
            LayoutKind::Compact,
            &handle,
            PointF::ORIGIN,
            0,
            "",
            &LayoutConfig::default(),
        );
        assert!(out.nodes.iter().all(|n| n.actions.ptr_eq(&handle)));

        let node = out.node("4").unwrap();
        node.actions.add(&node.id);
        node.actions.delete(&node.id);
        node.actions.edit(&node.id, "名", "役");
        assert_eq!(*recorder.calls.borrow(), vec!["add 4", "delete 4", "edit 4 名 役"]);
    }

    #[test]
    fn test_matches_search_flag() {
        let tree = sample_hierarchy();
        let handle = ActionsHandle::none();
        let cfg = LayoutConfig::default();
        let out = layout_hierarchy(&tree, LayoutKind::Radial, &handle, PointF::ORIGIN, 0, "営業", &cfg);
        assert_eq!(out.node("2").unwrap().matches_search, Some(true));
        assert_eq!(out.node("3").unwrap().matches_search, Some(false));

        let out = layout_hierarchy(&tree, LayoutKind::Radial, &handle, PointF::ORIGIN, 0, "", &cfg);
        assert!(out.nodes.iter().all(|n| n.matches_search.is_none()));
    }

    #[test]
    fn test_serialized_node_shape() {
        let tree = HierarchyNode::new("1", "A", "CEO");
        let out = layout_hierarchy(
            &tree,
            LayoutKind::Vertical,
            &ActionsHandle::none(),
            PointF::ORIGIN,
            0,
            "a",
            &LayoutConfig::default(),
        );
        let json = serde_json::to_value(&out.nodes[0]).unwrap();
        assert_eq!(json["matchesSearch"], true);
        assert_eq!(json["position"]["x"], 0.0);
        assert!(json.get("actions").is_none());
    }

    proptest! {
        #[test]
        fn test_every_layout_emits_n_nodes_and_n_minus_one_edges(tree in arb_tree()) {
            let n = count_nodes(&tree);
            let handle = ActionsHandle::none();
            let cfg = LayoutConfig::default();
            for kind in LayoutKind::ALL {
                let out = layout_hierarchy(&tree, kind, &handle, PointF::ORIGIN, 0, "", &cfg);
                prop_assert_eq!(out.nodes.len(), n);
                prop_assert_eq!(out.edges.len(), n - 1);

                let ids: HashSet<&str> = out.nodes.iter().map(|p| p.id.as_str()).collect();
                prop_assert_eq!(ids.len(), n);
                let edge_ids: HashSet<&str> = out.edges.iter().map(|e| e.id.as_str()).collect();
                prop_assert_eq!(edge_ids.len(), n - 1);
                for node in &out.nodes {
                    prop_assert!(node.position.x.is_finite() && node.position.y.is_finite());
                }
            }
        }
    }
}
