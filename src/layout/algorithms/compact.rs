//! Compact top-down layout.
//!
//! Like the vertical layout, but each child gets horizontal room proportional
//! to the size of its subtree, and larger subtrees are placed first. Denser
//! than the vertical layout on deep or unbalanced trees.

use crate::hierarchy::{count_nodes, HierarchyNode};
use crate::layout::{LayoutConfig, LayoutContext, LayoutResult, LayoutStrategy, PointF};

pub struct CompactLayout;

impl LayoutStrategy for CompactLayout {
    fn layout(
        &self,
        tree: &HierarchyNode,
        origin: PointF,
        level: usize,
        ctx: &LayoutContext<'_>,
        cfg: &LayoutConfig,
    ) -> LayoutResult {
        layout_compact(tree, origin, level, ctx, cfg)
    }
}

/// Number of nodes in the subtree rooted at `node`, itself included.
pub fn subtree_size(node: &HierarchyNode) -> usize {
    count_nodes(node)
}

pub fn layout_compact(
    tree: &HierarchyNode,
    origin: PointF,
    level: usize,
    ctx: &LayoutContext<'_>,
    cfg: &LayoutConfig,
) -> LayoutResult {
    let mut out = LayoutResult::default();
    place(tree, origin, level, ctx, cfg, &mut out);
    out
}

fn place(
    node: &HierarchyNode,
    pos: PointF,
    level: usize,
    ctx: &LayoutContext<'_>,
    cfg: &LayoutConfig,
    out: &mut LayoutResult,
) {
    ctx.emit(out, node, pos, level);
    if node.children.is_empty() {
        return;
    }

    // Largest subtree first; sort is stable so ties keep display order.
    let mut sized: Vec<(&HierarchyNode, f64)> = node
        .children
        .iter()
        .map(|c| (c, subtree_size(c) as f64 * cfg.compact_unit_width))
        .collect();
    sized.sort_by(|a, b| b.1.total_cmp(&a.1));

    let total: f64 = sized.iter().map(|(_, w)| w).sum();
    let mut left = pos.x - total / 2.0;
    for (child, width) in sized {
        let child_pos = PointF::new(left + width / 2.0, pos.y + cfg.compact_level_spacing);
        ctx.connect(out, node, child);
        place(child, child_pos, level + 1, ctx, cfg, out);
        left += width;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::sample_hierarchy;
    use crate::layout::ActionsHandle;

    fn run(tree: &HierarchyNode) -> LayoutResult {
        let handle = ActionsHandle::none();
        let ctx = LayoutContext::new(&handle, "");
        layout_compact(tree, PointF::ORIGIN, 0, &ctx, &LayoutConfig::default())
    }

    fn unbalanced() -> HierarchyNode {
        HierarchyNode::new("r", "", "").with_children(vec![
            HierarchyNode::new("small", "", ""),
            HierarchyNode::new("big", "", "").with_children(vec![
                HierarchyNode::new("b1", "", ""),
                HierarchyNode::new("b2", "", ""),
            ]),
            HierarchyNode::new("tie", "", ""),
        ])
    }

    #[test]
    fn test_subtree_size() {
        assert_eq!(subtree_size(&HierarchyNode::new("x", "", "")), 1);
        assert_eq!(subtree_size(&unbalanced()), 6);
    }

    #[test]
    fn test_larger_subtrees_first_and_ties_stable() {
        let out = run(&unbalanced());
        let children: Vec<&str> = out
            .edges
            .iter()
            .filter(|e| e.source == "r")
            .map(|e| e.target.as_str())
            .collect();
        assert_eq!(children, vec!["big", "small", "tie"]);
    }

    #[test]
    fn test_widths_proportional_to_subtree() {
        // widths: big 540, small 180, tie 180 => total 900, packed from -450
        let out = run(&unbalanced());
        assert_eq!(out.node("big").unwrap().position, PointF::new(-180.0, 100.0));
        assert_eq!(out.node("small").unwrap().position, PointF::new(180.0, 100.0));
        assert_eq!(out.node("tie").unwrap().position, PointF::new(360.0, 100.0));
        // big's leaves: 360 wide around -180
        assert_eq!(out.node("b1").unwrap().position, PointF::new(-270.0, 200.0));
        assert_eq!(out.node("b2").unwrap().position, PointF::new(-90.0, 200.0));
    }

    #[test]
    fn test_sample_levels() {
        let out = run(&sample_hierarchy());
        assert_eq!(out.node("1").unwrap().level, 0);
        assert_eq!(out.node("6").unwrap().level, 2);
        assert_eq!(out.node("6").unwrap().position.y, 200.0);
    }
}
