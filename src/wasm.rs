//! WASM bindings for the orgchart-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.

use serde_json::to_string;
use wasm_bindgen::prelude::*;

use crate::filter::FilterOptions;
use crate::hierarchy::HierarchyNode;
use crate::layout::{layout_hierarchy, ActionsHandle, LayoutConfig, LayoutKind, PointF};
use crate::output::{widget_elements, ChartOutput};
use crate::session::EditorSession;
use crate::storage::{self, LocalStorageStore};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

const SERIALIZE_ERROR: &str = "{\"error\": \"Serialization error\"}";

fn to_json_or_error<T: serde::Serialize>(value: &T) -> String {
    to_string(value).unwrap_or_else(|e| {
        console_error(&format!("Error serializing output: {:?}", e));
        SERIALIZE_ERROR.to_string()
    })
}

/// Chart editor backed by `localStorage`.
#[wasm_bindgen]
pub struct OrgChartEditor {
    session: EditorSession<LocalStorageStore>,
}

impl Default for OrgChartEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl OrgChartEditor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> OrgChartEditor {
        OrgChartEditor { session: EditorSession::new(LocalStorageStore::from_window()) }
    }

    /// Current nodes, edges and UI flags as JSON.
    pub fn render(&self) -> String {
        to_json_or_error(&ChartOutput::from_session(&self.session))
    }

    /// The current chart as JSON.
    pub fn chart(&self) -> String {
        to_json_or_error(self.session.chart())
    }

    pub fn add_node(&mut self, parent_id: &str) -> bool {
        self.session.add_child(parent_id)
    }

    pub fn delete_node(&mut self, node_id: &str) -> bool {
        self.session.delete_node(node_id)
    }

    pub fn edit_node(&mut self, node_id: &str, name: &str, title: &str) -> bool {
        self.session.edit_node(node_id, name, title)
    }

    pub fn bulk_edit(&mut self, title: &str) -> bool {
        self.session.bulk_edit_titles(title)
    }

    pub fn bulk_delete(&mut self) -> bool {
        self.session.bulk_delete()
    }

    /// Connection gesture: `source` moves under `target`.
    /// Returns an error message when the move is refused.
    pub fn connect(&mut self, source: &str, target: &str) -> Option<String> {
        self.session.connect(source, target).err().map(|e| {
            console_error(&format!("Error connecting nodes: {}", e));
            e.to_string()
        })
    }

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    /// Switch layout. Unknown names are rejected and leave the layout unchanged.
    pub fn set_layout(&mut self, layout: &str) -> bool {
        match layout.parse::<LayoutKind>() {
            Ok(kind) => {
                self.session.set_layout(kind);
                true
            }
            Err(e) => {
                console_error(&e);
                false
            }
        }
    }

    pub fn set_search(&mut self, query: &str) {
        self.session.set_search_query(query);
    }

    /// Replace filters from `{"levels": [..], "departments": [..]}`.
    pub fn set_filters(&mut self, json: &str) -> bool {
        match serde_json::from_str::<FilterOptions>(json) {
            Ok(filters) => {
                self.session.set_filters(filters);
                true
            }
            Err(e) => {
                console_error(&format!("Error parsing filters: {:?}", e));
                false
            }
        }
    }

    pub fn toggle_level(&mut self, level: usize) {
        self.session.toggle_level(level);
    }

    pub fn toggle_department(&mut self, department: &str) {
        self.session.toggle_department(department);
    }

    pub fn clear_filters(&mut self) {
        self.session.clear_filters();
    }

    /// Replace the selection from a JSON array of node ids.
    pub fn set_selection(&mut self, json: &str) -> bool {
        match serde_json::from_str::<Vec<String>>(json) {
            Ok(ids) => {
                self.session.set_selection(ids);
                true
            }
            Err(e) => {
                console_error(&format!("Error parsing selection: {:?}", e));
                false
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.session.clear_selection();
    }

    pub fn export_chart(&self) -> String {
        self.session.export_chart().unwrap_or_else(|e| {
            console_error(&format!("Error exporting chart: {}", e));
            String::new()
        })
    }

    /// Returns an error message when the data is rejected.
    pub fn import_chart(&mut self, json: &str) -> Option<String> {
        self.session.import_chart(json).err().map(|e| {
            console_error(&format!("Error importing chart: {}", e));
            e.to_string()
        })
    }

    /// Returns an error message when the chart could not be saved.
    pub fn save_chart(&mut self, name: &str) -> Option<String> {
        self.session.save_chart(name).err().map(|e| {
            console_error(&format!("Error saving chart: {}", e));
            e.to_string()
        })
    }

    /// Saved charts as a JSON array of `{id, name, timestamp}`.
    pub fn saved_charts(&self) -> String {
        to_json_or_error(&self.session.saved_charts())
    }

    pub fn load_chart(&mut self, id: &str) -> Option<String> {
        self.session.load_chart(id).err().map(|e| {
            console_error(&format!("Error loading chart: {}", e));
            e.to_string()
        })
    }

    pub fn delete_saved_chart(&mut self, id: &str) -> bool {
        self.session.delete_saved_chart(id)
    }
}

/// Stateless layout of a chart given as JSON. Returns widget nodes and edges.
#[wasm_bindgen]
pub fn layout_chart(chart_json: &str, layout: &str, search_query: &str) -> String {
    let chart: HierarchyNode = match storage::import_chart(chart_json) {
        Ok(chart) => chart,
        Err(e) => {
            console_error(&format!("Error parsing chart: {}", e));
            return format!("{{\"error\": {}}}", to_json_or_error(&e.to_string()));
        }
    };
    let kind = layout.parse::<LayoutKind>().unwrap_or_default();
    let result = layout_hierarchy(
        &chart,
        kind,
        &ActionsHandle::none(),
        PointF::ORIGIN,
        0,
        search_query,
        &LayoutConfig::default(),
    );
    let (nodes, edges) = widget_elements(&result, |_| false);
    to_json_or_error(&serde_json::json!({ "nodes": nodes, "edges": edges }))
}
