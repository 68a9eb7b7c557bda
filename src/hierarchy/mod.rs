//! The organisation tree and its pure edit operations.

mod department;
mod ids;
mod query;
mod types;
mod update;

pub use department::{extract_department, get_all_departments, DEPARTMENT_MARKERS};
pub use ids::{now_ms, IdGenerator};
pub use query::{
    collect_ids,
    count_nodes,
    find_node_by_id,
    find_parent_node,
    first_duplicate_id,
    is_descendant,
};
pub use types::{sample_hierarchy, HierarchyNode, PLACEHOLDER_NAME, PLACEHOLDER_TITLE};
pub use update::{
    add_child,
    bulk_update_titles,
    delete_node,
    move_node,
    try_move_node,
    update_node,
};
