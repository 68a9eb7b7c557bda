//! Top-down tree layout.
//!
//! Children of a node are spaced evenly on the row below it and centered
//! under the parent's x coordinate.

use crate::hierarchy::HierarchyNode;
use crate::layout::{centered_offsets, LayoutConfig, LayoutContext, LayoutResult, LayoutStrategy, PointF};

pub struct VerticalLayout;

impl LayoutStrategy for VerticalLayout {
    fn layout(
        &self,
        tree: &HierarchyNode,
        origin: PointF,
        level: usize,
        ctx: &LayoutContext<'_>,
        cfg: &LayoutConfig,
    ) -> LayoutResult {
        layout_vertical(tree, origin, level, ctx, cfg)
    }
}

pub fn layout_vertical(
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

    let offsets = centered_offsets(node.children.len(), cfg.vertical_sibling_spacing);
    for (child, dx) in node.children.iter().zip(offsets) {
        let child_pos = PointF::new(pos.x + dx, pos.y + cfg.vertical_level_spacing);
        ctx.connect(out, node, child);
        place(child, child_pos, level + 1, ctx, cfg, out);
    }
}
