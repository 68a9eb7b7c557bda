//! Editing session: the single owner of the chart, its history and view state.
//!
//! Every edit goes through here. An accepted edit produces a new tree, records
//! it in the history and autosaves it; edits that change nothing are dropped.

use std::collections::HashSet;

use crate::error::EditError;
use crate::filter::{search_and_filter, FilterOptions};
use crate::hierarchy::{
    self,
    find_node_by_id,
    get_all_departments,
    now_ms,
    sample_hierarchy,
    HierarchyNode,
    IdGenerator,
};
use crate::history::HistoryState;
use crate::layout::{layout_hierarchy, ActionsHandle, LayoutConfig, LayoutKind, LayoutResult, PointF};
use crate::storage::{self, ChartStore, KeyValueStore, SavedChart, SavedChartSummary};

/// Layout of the visible part of the chart.
#[derive(Debug, Clone, Default)]
pub struct RenderedChart {
    pub layout: LayoutResult,
    /// Search/filter matched nothing; the UI shows its empty-results state.
    pub no_results: bool,
}

pub struct EditorSession<S> {
    history: HistoryState<HierarchyNode>,
    ids: IdGenerator,
    store: ChartStore<S>,
    layout: LayoutKind,
    layout_config: LayoutConfig,
    search_query: String,
    filters: FilterOptions,
    selection: Vec<String>,
}

impl<S: KeyValueStore> EditorSession<S> {
    /// Start from the autosaved chart, or the sample organisation if there is none.
    pub fn new(store: S) -> Self {
        let store = ChartStore::new(store);
        let chart = store.load_current_chart().unwrap_or_else(sample_hierarchy);
        let layout = store.load_layout_preference();
        Self::from_parts(store, chart, layout, IdGenerator::from_clock())
    }

    /// Start from an explicit chart and id generator. Nothing is loaded from the store.
    pub fn with_chart(store: S, chart: HierarchyNode, ids: IdGenerator) -> Self {
        Self::from_parts(ChartStore::new(store), chart, LayoutKind::default(), ids)
    }

    fn from_parts(store: ChartStore<S>, chart: HierarchyNode, layout: LayoutKind, ids: IdGenerator) -> Self {
        Self {
            history: HistoryState::new(chart),
            ids,
            store,
            layout,
            layout_config: LayoutConfig::default(),
            search_query: String::new(),
            filters: FilterOptions::default(),
            selection: Vec::new(),
        }
    }

    pub fn with_layout_config(mut self, cfg: LayoutConfig) -> Self {
        self.layout_config = cfg;
        self
    }

    pub fn chart(&self) -> &HierarchyNode {
        self.history.present()
    }

    pub fn history(&self) -> &HistoryState<HierarchyNode> {
        &self.history
    }

    pub fn store(&self) -> &ChartStore<S> {
        &self.store
    }

    // ---- edits ----

    pub fn add_child(&mut self, parent_id: &str) -> bool {
        let next = hierarchy::add_child(self.history.present(), parent_id, &mut self.ids);
        self.commit(next)
    }

    pub fn delete_node(&mut self, node_id: &str) -> bool {
        let next = hierarchy::delete_node(self.chart(), node_id);
        self.commit(next)
    }

    pub fn edit_node(&mut self, node_id: &str, name: &str, title: &str) -> bool {
        let next = hierarchy::update_node(self.chart(), node_id, name, title);
        self.commit(next)
    }

    /// Set `title` on every selected node.
    pub fn bulk_edit_titles(&mut self, title: &str) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let next = hierarchy::bulk_update_titles(self.chart(), self.selection.as_slice(), title);
        self.commit(next)
    }

    /// Delete every selected node as a single undoable edit, then clear the selection.
    pub fn bulk_delete(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let next = self
            .selection
            .iter()
            .fold(self.chart().clone(), |tree, id| hierarchy::delete_node(&tree, id));
        self.selection.clear();
        self.commit(next)
    }

    /// Move `node_id` under `new_parent_id`.
    pub fn reparent(&mut self, node_id: &str, new_parent_id: &str) -> Result<(), EditError> {
        let result = hierarchy::try_move_node(self.chart(), node_id, new_parent_id);
        match result {
            Ok(next) => {
                self.commit(next);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(node_id, new_parent_id, error = %e, "re-parent refused");
                Err(e.into())
            }
        }
    }

    /// Connection gesture from the widget. The dragged-from node (`source`)
    /// moves under the dropped-on node (`target`).
    pub fn connect(&mut self, source: &str, target: &str) -> Result<(), EditError> {
        self.reparent(source, target)
    }

    pub fn undo(&mut self) -> bool {
        if !self.history.can_undo() {
            return false;
        }
        self.update_history(HistoryState::undo);
        self.autosave();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.history.can_redo() {
            return false;
        }
        self.update_history(HistoryState::redo);
        self.autosave();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn commit(&mut self, next: HierarchyNode) -> bool {
        if &next == self.chart() {
            return false;
        }
        self.update_history(|h| h.record(next));
        self.retain_existing_selection();
        self.autosave();
        true
    }

    fn update_history(&mut self, f: impl FnOnce(HistoryState<HierarchyNode>) -> HistoryState<HierarchyNode>) {
        let empty = HistoryState::new(HierarchyNode::new("", "", ""));
        let current = std::mem::replace(&mut self.history, empty);
        self.history = f(current);
    }

    fn autosave(&mut self) {
        // Logged by the store; the in-memory chart stays authoritative.
        let _ = self.store.save_current_chart(self.history.present());
    }

    fn retain_existing_selection(&mut self) {
        let chart = self.history.present();
        self.selection.retain(|id| find_node_by_id(chart, id).is_some());
    }

    // ---- view state ----

    pub fn layout(&self) -> LayoutKind {
        self.layout
    }

    pub fn set_layout(&mut self, layout: LayoutKind) {
        self.layout = layout;
        let _ = self.store.save_layout_preference(layout);
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
    }

    pub fn filters(&self) -> &FilterOptions {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: FilterOptions) {
        self.filters = filters;
    }

    pub fn toggle_level(&mut self, level: usize) {
        self.filters.toggle_level(level);
    }

    pub fn toggle_department(&mut self, department: &str) {
        self.filters.toggle_department(department);
    }

    /// Clear both the search query and all filters.
    pub fn clear_filters(&mut self) {
        self.search_query.clear();
        self.filters.clear();
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    /// Replace the selection. Unknown and repeated ids are dropped.
    pub fn set_selection<I, T>(&mut self, ids: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut seen = HashSet::new();
        self.selection = ids
            .into_iter()
            .map(Into::into)
            .filter(|id| seen.insert(id.clone()))
            .collect();
        self.retain_existing_selection();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, node_id: &str) -> bool {
        self.selection.iter().any(|id| id == node_id)
    }

    /// Departments offered by the filter menu.
    pub fn departments(&self) -> Vec<String> {
        get_all_departments(self.chart())
    }

    /// Filter the chart and lay out whatever remains visible.
    pub fn render(&self, actions: &ActionsHandle) -> RenderedChart {
        match search_and_filter(self.chart(), &self.search_query, &self.filters) {
            Some(visible) => RenderedChart {
                layout: layout_hierarchy(
                    &visible,
                    self.layout,
                    actions,
                    PointF::ORIGIN,
                    0,
                    &self.search_query,
                    &self.layout_config,
                ),
                no_results: false,
            },
            None => RenderedChart { layout: LayoutResult::default(), no_results: true },
        }
    }

    // ---- saved charts ----

    pub fn save_chart(&mut self, name: &str) -> Result<SavedChart, EditError> {
        let chart = self.history.present().clone();
        Ok(self.store.save_chart(name, &chart, now_ms())?)
    }

    pub fn saved_charts(&self) -> Vec<SavedChartSummary> {
        self.store.saved_chart_summaries()
    }

    /// Replace the chart with a saved one. Undo returns to the previous chart.
    pub fn load_chart(&mut self, id: &str) -> Result<(), EditError> {
        let chart = self
            .store
            .load_chart(id)
            .ok_or_else(|| EditError::UnknownChart(id.to_string()))?;
        self.commit(chart);
        Ok(())
    }

    pub fn delete_saved_chart(&mut self, id: &str) -> bool {
        self.store.delete_chart(id)
    }

    pub fn export_chart(&self) -> Result<String, EditError> {
        Ok(storage::export_chart(self.chart())?)
    }

    /// Replace the chart with imported JSON. Undo returns to the previous chart.
    pub fn import_chart(&mut self, json: &str) -> Result<(), EditError> {
        let chart = storage::import_chart(json)?;
        self.commit(chart);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MoveError;
    use crate::hierarchy::{count_nodes, find_parent_node, PLACEHOLDER_NAME};
    use crate::storage::tests::FullStore;
    use crate::storage::{MemoryStore, CURRENT_CHART_KEY};

    fn session() -> EditorSession<MemoryStore> {
        EditorSession::with_chart(MemoryStore::new(), sample_hierarchy(), IdGenerator::starting_at(100))
    }

    #[test]
    fn test_new_session_uses_sample_then_autosave() {
        let s = EditorSession::new(MemoryStore::new());
        assert_eq!(s.chart(), &sample_hierarchy());
        assert_eq!(s.layout(), LayoutKind::Vertical);

        let mut mem = MemoryStore::new();
        let saved = HierarchyNode::new("a", "A", "社長");
        mem.set_item(CURRENT_CHART_KEY, &serde_json::to_string(&saved).unwrap()).unwrap();
        let s = EditorSession::new(mem);
        assert_eq!(s.chart(), &saved);
    }

    #[test]
    fn test_add_records_history_and_autosaves() {
        let mut s = session();
        assert!(s.add_child("2"));
        assert_eq!(count_nodes(s.chart()), 8);
        assert_eq!(find_node_by_id(s.chart(), "100").unwrap().name, PLACEHOLDER_NAME);
        assert!(s.can_undo());
        assert_eq!(s.store().load_current_chart().as_ref(), Some(s.chart()));

        assert!(s.undo());
        assert_eq!(s.chart(), &sample_hierarchy());
        assert_eq!(s.store().load_current_chart(), Some(sample_hierarchy()));
        assert!(s.redo());
        assert_eq!(count_nodes(s.chart()), 8);
    }

    #[test]
    fn test_noop_edits_are_not_recorded() {
        let mut s = session();
        assert!(!s.add_child("missing"));
        assert!(!s.delete_node("1"));
        assert!(!s.edit_node("missing", "a", "b"));
        assert!(!s.can_undo());
        assert!(!s.undo());
        assert!(!s.redo());
    }

    #[test]
    fn test_bulk_edit_and_delete_selection() {
        let mut s = session();
        assert!(!s.bulk_edit_titles("主任"));

        s.set_selection(["4", "6", "missing", "4"]);
        assert_eq!(s.selection(), &["4".to_string(), "6".to_string()]);
        assert!(s.bulk_edit_titles("主任"));
        assert_eq!(find_node_by_id(s.chart(), "6").unwrap().title, "主任");

        assert!(s.bulk_delete());
        assert!(s.selection().is_empty());
        assert_eq!(count_nodes(s.chart()), 5);
        // one undo step for the whole bulk delete
        assert!(s.undo());
        assert_eq!(count_nodes(s.chart()), 7);
    }

    #[test]
    fn test_delete_drops_stale_selection() {
        let mut s = session();
        s.set_selection(["2", "4", "6"]);
        s.delete_node("2");
        assert_eq!(s.selection(), &["6".to_string()]);
    }

    #[test]
    fn test_connect_moves_source_under_target() {
        let mut s = session();
        s.connect("4", "3").unwrap();
        assert_eq!(find_parent_node(s.chart(), "4").unwrap().id, "3");
        // 技術部 stays under the root
        assert_eq!(find_parent_node(s.chart(), "3").unwrap().id, "1");
        assert_eq!(find_node_by_id(s.chart(), "3").unwrap().children.last().unwrap().id, "4");

        let before = s.chart().clone();
        assert_eq!(s.connect("2", "5"), Err(EditError::Move(MoveError::IntoDescendant)));
        assert_eq!(s.chart(), &before);
        assert!(matches!(
            s.reparent("5", "missing"),
            Err(EditError::Move(MoveError::UnknownParent(_)))
        ));
    }

    #[test]
    fn test_render_vertical_sample() {
        let s = session();
        let out = s.render(&ActionsHandle::none());
        assert!(!out.no_results);
        assert_eq!(out.layout.nodes.len(), 7);
        assert_eq!(out.layout.edges.len(), 6);
        assert_eq!(out.layout.node("2").unwrap().position, PointF::new(-125.0, 150.0));
    }

    #[test]
    fn test_render_with_search_and_no_results() {
        let mut s = session();
        s.set_search_query("伊藤");
        let out = s.render(&ActionsHandle::none());
        let ids: Vec<&str> = out.layout.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "6"]);
        assert_eq!(out.layout.node("6").unwrap().matches_search, Some(true));
        assert_eq!(out.layout.node("3").unwrap().matches_search, Some(false));

        s.set_search_query("誰もいない");
        let out = s.render(&ActionsHandle::none());
        assert!(out.no_results);
        assert!(out.layout.is_empty());

        s.clear_filters();
        assert_eq!(s.render(&ActionsHandle::none()).layout.nodes.len(), 7);
    }

    #[test]
    fn test_filters_and_departments() {
        let mut s = session();
        assert!(s.departments().contains(&"営業部".to_string()));
        s.toggle_department("営業部");
        s.toggle_level(1);
        let out = s.render(&ActionsHandle::none());
        assert_eq!(out.layout.nodes.len(), 2);
    }

    #[test]
    fn test_layout_choice_persists() {
        let mut s = session();
        s.set_layout(LayoutKind::Radial);
        assert_eq!(s.store().load_layout_preference(), LayoutKind::Radial);
        let out = s.render(&ActionsHandle::none());
        assert_eq!(out.layout.node("1").unwrap().position, PointF::ORIGIN);
    }

    #[test]
    fn test_save_load_and_import() {
        let mut s = session();
        let saved = s.save_chart("初版").unwrap();
        assert_eq!(s.saved_charts().len(), 1);
        assert!(matches!(s.save_chart(""), Err(EditError::Store(_))));

        s.delete_node("2");
        s.load_chart(&saved.id).unwrap();
        assert_eq!(s.chart(), &sample_hierarchy());
        assert_eq!(s.load_chart("chart-0"), Err(EditError::UnknownChart("chart-0".to_string())));

        s.import_chart(r#"{"id":"x","name":"X","title":"社長"}"#).unwrap();
        assert_eq!(s.chart().id, "x");
        assert!(matches!(s.import_chart("{}"), Err(EditError::Import(_))));
        assert!(s.undo());
        assert_eq!(s.chart(), &sample_hierarchy());

        let exported = s.export_chart().unwrap();
        assert_eq!(storage::import_chart(&exported).unwrap(), sample_hierarchy());
        assert!(s.delete_saved_chart(&saved.id));
        assert!(s.saved_charts().is_empty());
    }

    #[test]
    fn test_storage_failure_is_not_fatal() {
        let mut s = EditorSession::with_chart(FullStore::default(), sample_hierarchy(), IdGenerator::starting_at(1));
        assert!(s.add_child("1"));
        assert_eq!(count_nodes(s.chart()), 8);
        s.set_layout(LayoutKind::Compact);
        assert_eq!(s.layout(), LayoutKind::Compact);
        assert!(s.save_chart("x").is_err());
    }
}
