//! Org chart editing core.
//!
//! Pure tree edits, search/filter visibility, four layout algorithms and
//! undo/redo, plus the session, persistence and wasm glue used by the web UI.

pub mod error;
pub mod filter;
pub mod hierarchy;
pub mod history;
pub mod layout;
pub mod output;
pub mod session;
pub mod storage;
mod wasm;

pub use error::{EditError, ImportError, MoveError, StoreError};
pub use filter::{search_and_filter, FilterOptions, MAX_LEVEL};
pub use hierarchy::{
    add_child,
    bulk_update_titles,
    count_nodes,
    delete_node,
    extract_department,
    find_node_by_id,
    find_parent_node,
    get_all_departments,
    move_node,
    try_move_node,
    update_node,
    HierarchyNode,
    IdGenerator,
};
pub use history::HistoryState;
pub use layout::{
    layout_hierarchy,
    ActionsHandle,
    LayoutConfig,
    LayoutKind,
    LayoutResult,
    NodeActions,
    PointF,
    PositionedEdge,
    PositionedNode,
};
pub use session::{EditorSession, RenderedChart};
pub use storage::{export_chart, import_chart, ChartStore, KeyValueStore, MemoryStore};
pub use wasm::{layout_chart, OrgChartEditor};
