//! Left-to-right tree layout: the vertical layout with its axes swapped.

use crate::hierarchy::HierarchyNode;
use crate::layout::{centered_offsets, LayoutConfig, LayoutContext, LayoutResult, LayoutStrategy, PointF};

pub struct HorizontalLayout;

impl LayoutStrategy for HorizontalLayout {
    fn layout(
        &self,
        tree: &HierarchyNode,
        origin: PointF,
        level: usize,
        ctx: &LayoutContext<'_>,
        cfg: &LayoutConfig,
    ) -> LayoutResult {
        layout_horizontal(tree, origin, level, ctx, cfg)
    }
}

pub fn layout_horizontal(
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

    let offsets = centered_offsets(node.children.len(), cfg.horizontal_sibling_spacing);
    for (child, dy) in node.children.iter().zip(offsets) {
        let child_pos = PointF::new(pos.x + cfg.horizontal_level_spacing, pos.y + dy);
        ctx.connect(out, node, child);
        place(child, child_pos, level + 1, ctx, cfg, out);
    }
}
