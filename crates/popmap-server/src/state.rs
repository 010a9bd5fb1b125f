//! Shared server state: the loaded catalog and the loader that refreshes it.

use std::{path::PathBuf, sync::Arc};

use chrono::{DateTime, Utc};
use popmap_core::{StoreRecord, ViewConfig};
use popmap_source::{LoadOrigin, LoadOutcome, LoadTracker, StoreLoader};
use tokio::sync::RwLock;

/// Records currently served, with where they came from.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub stores: Vec<StoreRecord>,
    pub origin: LoadOrigin,
    pub warning: Option<String>,
    /// `None` until the first load completes.
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Default for CatalogSnapshot {
    fn default() -> Self {
        Self {
            stores: Vec::new(),
            origin: LoadOrigin::Live,
            warning: None,
            loaded_at: None,
        }
    }
}

impl From<LoadOutcome> for CatalogSnapshot {
    fn from(outcome: LoadOutcome) -> Self {
        Self {
            stores: outcome.stores,
            origin: outcome.origin,
            warning: outcome.warning,
            loaded_at: Some(Utc::now()),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<RwLock<CatalogSnapshot>>,
    pub loader: Arc<StoreLoader>,
    pub tracker: LoadTracker,
    pub view: Arc<ViewConfig>,
    /// File served verbatim at `/stores.json`.
    pub snapshot_path: Arc<PathBuf>,
}

impl AppState {
    #[must_use]
    pub fn new(loader: StoreLoader, view: ViewConfig, snapshot_path: PathBuf) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(CatalogSnapshot::default())),
            loader: Arc::new(loader),
            tracker: LoadTracker::new(),
            view: Arc::new(view),
            snapshot_path: Arc::new(snapshot_path),
        }
    }

    /// Loads a fresh snapshot and swaps it in wholesale.
    ///
    /// Returns `None` when a newer refresh started (or the tracker was
    /// cancelled) before this one finished; its result is discarded.
    pub async fn refresh(&self) -> Option<LoadOrigin> {
        let ticket = self.tracker.begin();
        let outcome = self.loader.load_tracked(&ticket).await?;

        let mut catalog = self.catalog.write().await;
        if !ticket.is_current() {
            return None;
        }
        let origin = outcome.origin;
        tracing::info!(
            generation = ticket.generation(),
            origin = %origin,
            count = outcome.stores.len(),
            "catalog refreshed"
        );
        *catalog = CatalogSnapshot::from(outcome);
        Some(origin)
    }
}
