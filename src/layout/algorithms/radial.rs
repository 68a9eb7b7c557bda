// Radial tree layout.
//
// The root sits at (0, 0). Every child is placed on a circle around its own
// parent, with radius growing by one ring per level:
// - root's children share the full circle, evenly spaced from angle 0
// - deeper children share a quarter-circle arc centered on the angle at
//   which their parent was placed, endpoints included
//
// Properties:
// - Deterministic (no randomness)
// - Depth is visible as distance from the center

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::hierarchy::HierarchyNode;
use crate::layout::{LayoutConfig, LayoutContext, LayoutResult, LayoutStrategy, PointF};

pub struct RadialLayout;

impl LayoutStrategy for RadialLayout {
    fn layout(
        &self,
        tree: &HierarchyNode,
        _origin: PointF,
        level: usize,
        ctx: &LayoutContext<'_>,
        cfg: &LayoutConfig,
    ) -> LayoutResult {
        layout_radial(tree, level, ctx, cfg)
    }
}

/// Radial layout; the root is always centered on the origin.
pub fn layout_radial(
    tree: &HierarchyNode,
    level: usize,
    ctx: &LayoutContext<'_>,
    cfg: &LayoutConfig,
) -> LayoutResult {
    let mut out = LayoutResult::default();
    place(tree, PointF::ORIGIN, level, None, ctx, cfg, &mut out);
    out
}

/// Angles for `count` children. `incoming` is the angle the parent was placed
/// at, `None` for the root.
fn child_angles(count: usize, incoming: Option<f64>) -> impl Iterator<Item = f64> {
    let (start, step) = match incoming {
        // Full circle, half-open [0, 2pi): step is 2pi / k, not 2pi / (k - 1),
        // so the last child does not land on the first.
        None => (0.0, 2.0 * PI / count.max(1) as f64),
        Some(angle) => (angle - FRAC_PI_4, FRAC_PI_2 / count.saturating_sub(1).max(1) as f64),
    };
    (0..count).map(move |i| start + i as f64 * step)
}

fn place(
    node: &HierarchyNode,
    pos: PointF,
    level: usize,
    incoming: Option<f64>,
    ctx: &LayoutContext<'_>,
    cfg: &LayoutConfig,
    out: &mut LayoutResult,
) {
    ctx.emit(out, node, pos, level);

    let child_level = level + 1;
    let radius = cfg.radial_ring_spacing * child_level as f64;
    for (child, angle) in node.children.iter().zip(child_angles(node.children.len(), incoming)) {
        let child_pos = PointF::new(pos.x + radius * angle.cos(), pos.y + radius * angle.sin());
        ctx.connect(out, node, child);
        place(child, child_pos, child_level, Some(angle), ctx, cfg, out);
    }
}
