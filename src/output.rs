//! Output types for the diagram widget.
//!
//! These structs are serialized to JSON and handed to the React Flow canvas
//! for rendering the chart.

use serde::Serialize;

use crate::layout::{ActionsHandle, LayoutKind, LayoutResult, PointF};
use crate::session::EditorSession;
use crate::storage::KeyValueStore;

/// Node type the widget maps to the org chart card component.
pub const ORG_NODE_TYPE: &str = "orgNode";
/// Curve style for parent -> child edges.
pub const EDGE_TYPE: &str = "smoothstep";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub name: String,
    pub title: String,
    pub level: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches_search: Option<bool>,
    pub is_selected: bool,
}

/// A positioned node ready for the widget to display
#[derive(Debug, Clone, Serialize)]
pub struct NodeOutput {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: &'static str,
    pub position: PointF,
    pub data: NodeData,
}

/// An edge between a parent and a child
#[derive(Debug, Clone, Serialize)]
pub struct EdgeOutput {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: &'static str,
}

/// Everything the page needs to redraw after an action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOutput {
    pub nodes: Vec<NodeOutput>,
    pub edges: Vec<EdgeOutput>,
    /// Search/filter matched nothing.
    pub no_results: bool,
    pub layout: LayoutKind,
    pub can_undo: bool,
    pub can_redo: bool,
    pub departments: Vec<String>,
    pub selected_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChartOutput {
    pub fn from_session<S: KeyValueStore>(session: &EditorSession<S>) -> Self {
        // The widget calls back into the session directly; no per-node callbacks cross the boundary.
        let rendered = session.render(&ActionsHandle::none());
        let (nodes, edges) = widget_elements(&rendered.layout, |id| session.is_selected(id));
        Self {
            nodes,
            edges,
            no_results: rendered.no_results,
            layout: session.layout(),
            can_undo: session.can_undo(),
            can_redo: session.can_redo(),
            departments: session.departments(),
            selected_count: session.selection().len(),
            error: None,
        }
    }

    pub fn with_error(mut self, msg: impl Into<String>) -> Self {
        self.error = Some(msg.into());
        self
    }
}

/// Convert a layout into widget nodes and edges.
pub fn widget_elements(
    layout: &LayoutResult,
    is_selected: impl Fn(&str) -> bool,
) -> (Vec<NodeOutput>, Vec<EdgeOutput>) {
    let nodes = layout
        .nodes
        .iter()
        .map(|n| NodeOutput {
            id: n.id.clone(),
            node_type: ORG_NODE_TYPE,
            position: n.position,
            data: NodeData {
                name: n.name.clone(),
                title: n.title.clone(),
                level: n.level,
                matches_search: n.matches_search,
                is_selected: is_selected(&n.id),
            },
        })
        .collect();
    let edges = layout
        .edges
        .iter()
        .map(|e| EdgeOutput {
            id: e.id.clone(),
            source: e.source.clone(),
            target: e.target.clone(),
            edge_type: EDGE_TYPE,
        })
        .collect();
    (nodes, edges)
}
