//! Layout algorithms for org charts.
//!
//! This module contains all available layout algorithms:
//! - `vertical`: classic top-down tree, children centered under the parent
//! - `horizontal`: left-to-right tree, children centered beside the parent
//! - `radial`: root at the center, descendants on arcs around their parent
//! - `compact`: top-down tree with widths weighted by subtree size

mod compact;
mod horizontal;
mod radial;
mod vertical;

pub use compact::{CompactLayout, layout_compact, subtree_size};
pub use horizontal::{HorizontalLayout, layout_horizontal};
pub use radial::{RadialLayout, layout_radial};
pub use vertical::{VerticalLayout, layout_vertical};
