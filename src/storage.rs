//! Persistence boundary.
//!
//! Charts are kept as JSON strings in a string key/value store: the browser's
//! `localStorage` in production, [`MemoryStore`] in tests and native hosts.
//! Failures are logged here and reported to the caller, who treats them as
//! non-fatal: the in-memory tree stays authoritative.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ImportError, StoreError};
use crate::hierarchy::{first_duplicate_id, HierarchyNode};
use crate::layout::LayoutKind;

pub const CURRENT_CHART_KEY: &str = "org-chart-current";
pub const CHARTS_LIST_KEY: &str = "org-chart-list";
pub const LAYOUT_KEY: &str = "org-chart-layout";

/// Prefix of saved chart ids; the creation timestamp follows.
pub const CHART_ID_PREFIX: &str = "chart-";

/// Minimal string store, shaped after the Web Storage API.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        self.items.remove(key);
        Ok(())
    }
}

/// `window.localStorage`. Holds `None` when storage is disabled or there is no window.
pub struct LocalStorageStore {
    storage: Option<web_sys::Storage>,
}

impl LocalStorageStore {
    pub fn from_window() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        Self { storage }
    }

    fn storage(&self) -> Result<&web_sys::Storage, StoreError> {
        self.storage.as_ref().ok_or(StoreError::Unavailable)
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?.get_item(key).map_err(|e| StoreError::Read {
            key: key.to_string(),
            msg: format!("{:?}", e),
        })
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?.set_item(key, value).map_err(|e| StoreError::Write {
            key: key.to_string(),
            msg: format!("{:?}", e),
        })
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage()?.remove_item(key).map_err(|e| StoreError::Write {
            key: key.to_string(),
            msg: format!("{:?}", e),
        })
    }
}

/// A named snapshot in the saved-chart list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedChart {
    pub id: String,
    pub name: String,
    /// Creation time, ms since the Unix epoch.
    pub timestamp: u64,
    pub data: HierarchyNode,
}

/// Saved chart without its tree, for listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedChartSummary {
    pub id: String,
    pub name: String,
    pub timestamp: u64,
}

impl From<&SavedChart> for SavedChartSummary {
    fn from(chart: &SavedChart) -> Self {
        Self { id: chart.id.clone(), name: chart.name.clone(), timestamp: chart.timestamp }
    }
}

/// Chart persistence on top of any [`KeyValueStore`].
pub struct ChartStore<S> {
    store: S,
}

impl<S: KeyValueStore> ChartStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn save_current_chart(&mut self, data: &HierarchyNode) -> Result<(), StoreError> {
        let result = to_json(data).and_then(|json| self.store.set_item(CURRENT_CHART_KEY, &json));
        if let Err(e) = &result {
            tracing::error!(key = CURRENT_CHART_KEY, error = %e, "failed to save current chart");
        }
        result
    }

    /// The autosaved chart, if one exists and decodes.
    pub fn load_current_chart(&self) -> Option<HierarchyNode> {
        match self.read_json::<HierarchyNode>(CURRENT_CHART_KEY) {
            Ok(chart) => chart,
            Err(e) => {
                tracing::error!(key = CURRENT_CHART_KEY, error = %e, "failed to load current chart");
                None
            }
        }
    }

    /// Append `data` to the saved-chart list under `name`.
    pub fn save_chart(
        &mut self,
        name: &str,
        data: &HierarchyNode,
        timestamp: u64,
    ) -> Result<SavedChart, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        let mut charts = self.read_json::<Vec<SavedChart>>(CHARTS_LIST_KEY)?.unwrap_or_default();
        let chart = SavedChart {
            id: unique_chart_id(&charts, timestamp),
            name: name.to_string(),
            timestamp,
            data: data.clone(),
        };
        charts.push(chart.clone());
        self.write_list(&charts).map_err(|e| {
            tracing::error!(key = CHARTS_LIST_KEY, error = %e, "failed to save chart");
            e
        })?;
        Ok(chart)
    }

    /// All saved charts, oldest first. Empty when the list is missing or unreadable.
    pub fn saved_charts(&self) -> Vec<SavedChart> {
        match self.read_json::<Vec<SavedChart>>(CHARTS_LIST_KEY) {
            Ok(charts) => charts.unwrap_or_default(),
            Err(e) => {
                tracing::error!(key = CHARTS_LIST_KEY, error = %e, "failed to get saved charts");
                Vec::new()
            }
        }
    }

    pub fn saved_chart_summaries(&self) -> Vec<SavedChartSummary> {
        self.saved_charts().iter().map(SavedChartSummary::from).collect()
    }

    /// Look up a saved chart and make it the current chart.
    pub fn load_chart(&mut self, id: &str) -> Option<HierarchyNode> {
        let chart = self.saved_charts().into_iter().find(|c| c.id == id)?;
        // The chart is still returned if autosave fails; that error is logged already.
        let _ = self.save_current_chart(&chart.data);
        Some(chart.data)
    }

    /// Remove a saved chart. Returns false if the store could not be written.
    pub fn delete_chart(&mut self, id: &str) -> bool {
        let mut charts = self.saved_charts();
        charts.retain(|c| c.id != id);
        match self.write_list(&charts) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key = CHARTS_LIST_KEY, chart_id = id, error = %e, "failed to delete chart");
                false
            }
        }
    }

    pub fn save_layout_preference(&mut self, layout: LayoutKind) -> Result<(), StoreError> {
        let result = self.store.set_item(LAYOUT_KEY, layout.as_str());
        if let Err(e) = &result {
            tracing::error!(key = LAYOUT_KEY, error = %e, "failed to save layout preference");
        }
        result
    }

    /// Stored layout, or vertical when missing or unrecognised.
    pub fn load_layout_preference(&self) -> LayoutKind {
        match self.store.get_item(LAYOUT_KEY) {
            Ok(Some(value)) => value.parse().unwrap_or_else(|e: String| {
                tracing::warn!(key = LAYOUT_KEY, error = %e, "ignoring stored layout");
                LayoutKind::default()
            }),
            Ok(None) => LayoutKind::default(),
            Err(e) => {
                tracing::error!(key = LAYOUT_KEY, error = %e, "failed to load layout preference");
                LayoutKind::default()
            }
        }
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.store.get_item(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw).map(Some).map_err(|e| StoreError::Deserialize {
            key: key.to_string(),
            msg: e.to_string(),
        })
    }

    fn write_list(&mut self, charts: &[SavedChart]) -> Result<(), StoreError> {
        let json = to_json(charts)?;
        self.store.set_item(CHARTS_LIST_KEY, &json)
    }
}

/// `chart-{timestamp}`, suffixed with the smallest free `-{n}` when that id is taken.
fn unique_chart_id(charts: &[SavedChart], timestamp: u64) -> String {
    let base = format!("{}{}", CHART_ID_PREFIX, timestamp);
    let taken = |id: &str| charts.iter().any(|c| c.id == id);
    if !taken(&base) {
        return base;
    }
    (1u64..)
        .map(|n| format!("{}-{}", base, n))
        .find(|id| !taken(id))
        .unwrap_or(base)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|e| StoreError::Serialize(e.to_string()))
}

/// Pretty-printed JSON of the tree.
pub fn export_chart(data: &HierarchyNode) -> Result<String, StoreError> {
    serde_json::to_string_pretty(data).map_err(|e| StoreError::Serialize(e.to_string()))
}

/// Parse an exported chart.
///
/// The top level must be an object with `id`, `name` and `title`; the whole
/// tree must then decode and keep its ids unique.
pub fn import_chart(json: &str) -> Result<HierarchyNode, ImportError> {
    let result = parse_chart(json);
    if let Err(e) = &result {
        tracing::warn!(error = %e, "failed to import chart");
    }
    result
}

fn parse_chart(json: &str) -> Result<HierarchyNode, ImportError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| ImportError::InvalidJson(e.to_string()))?;
    let obj = value.as_object().ok_or(ImportError::NotAnObject)?;
    for field in ["id", "name", "title"] {
        if !obj.contains_key(field) {
            return Err(ImportError::MissingField(field));
        }
    }
    let tree: HierarchyNode =
        serde_json::from_value(value).map_err(|e| ImportError::Malformed(e.to_string()))?;
    if let Some(dup) = first_duplicate_id(&tree) {
        return Err(ImportError::DuplicateId(dup.to_string()));
    }
    Ok(tree)
}
