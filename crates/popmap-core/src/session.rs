//! Single-writer UI state for one map view.

use crate::filter::{filter_stores, StoreFilter};
use crate::stores::{Category, StoreRecord};
use crate::view::{MapController, ViewConfig, STORE_ZOOM};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    /// Bundled data is shown because the live snapshot could not be read.
    Fallback { warning: String },
}

/// Records, filter inputs, selection and the registered map for one view.
///
/// All mutation goes through `&mut self`; front ends own exactly one.
pub struct StoreSession {
    stores: Vec<StoreRecord>,
    load_state: LoadState,
    filter: StoreFilter,
    selected: Option<StoreRecord>,
    map: Option<Box<dyn MapController>>,
    view: ViewConfig,
}

impl StoreSession {
    #[must_use]
    pub fn new(view: ViewConfig) -> Self {
        Self {
            stores: Vec::new(),
            load_state: LoadState::Loading,
            filter: StoreFilter::default(),
            selected: None,
            map: None,
            view,
        }
    }

    /// Replaces the record set with a finished load. A `warning` marks the
    /// records as fallback data.
    pub fn apply_load(&mut self, stores: Vec<StoreRecord>, warning: Option<String>) {
        self.load_state = match warning {
            Some(warning) => {
                tracing::warn!(%warning, count = stores.len(), "showing fallback stores");
                LoadState::Fallback { warning }
            }
            None => LoadState::Ready,
        };
        self.stores = stores;
    }

    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    #[must_use]
    pub fn warning(&self) -> Option<&str> {
        match &self.load_state {
            LoadState::Fallback { warning } => Some(warning),
            _ => None,
        }
    }

    #[must_use]
    pub fn stores(&self) -> &[StoreRecord] {
        &self.stores
    }

    #[must_use]
    pub fn filter(&self) -> &StoreFilter {
        &self.filter
    }

    #[must_use]
    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    pub fn set_category(&mut self, category: Category) {
        self.filter.category = category;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.query = Some(query.into());
    }

    /// Records passing the active filter, in snapshot order.
    #[must_use]
    pub fn visible(&self) -> Vec<&StoreRecord> {
        filter_stores(&self.stores, &self.filter)
    }

    /// Visible records truncated to the marker cap.
    #[must_use]
    pub fn markers(&self) -> Vec<&StoreRecord> {
        let visible = self.visible();
        self.view.cap_markers(&visible).to_vec()
    }

    /// Opens the detail view for `id`. Returns the selected record, or
    /// `None` when no loaded record has that id.
    pub fn select_store(&mut self, id: i64) -> Option<&StoreRecord> {
        let store = self.stores.iter().find(|s| s.id == id)?.clone();
        self.selected = Some(store);
        self.selected.as_ref()
    }

    #[must_use]
    pub fn selected(&self) -> Option<&StoreRecord> {
        self.selected.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Hands the session the map widget once it exists.
    pub fn register_map(&mut self, map: Box<dyn MapController>) {
        self.map = Some(map);
    }

    /// Recenters the map on `(lat, lng)` at store zoom as soon as the map
    /// reports ready. Returns `false` when no map is registered yet.
    pub fn zoom_to_store(&mut self, lat: f64, lng: f64) -> bool {
        let Some(map) = self.map.as_mut() else {
            tracing::debug!(lat, lng, "zoom requested before the map registered");
            return false;
        };
        map.on_ready(Box::new(move |map: &mut dyn MapController| {
            map.recenter(lat, lng, STORE_ZOOM);
        }));
        true
    }
}

impl Default for StoreSession {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

impl std::fmt::Debug for StoreSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreSession")
            .field("stores", &self.stores.len())
            .field("load_state", &self.load_state)
            .field("filter", &self.filter)
            .field("selected", &self.selected.as_ref().map(|s| s.id))
            .field("map", &self.map.is_some())
            .field("view", &self.view)
            .finish()
    }
}
