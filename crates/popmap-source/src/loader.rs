//! Snapshot loading with fallback substitution.
//!
//! [`StoreLoader::load`] never fails: any read, status, or decode error is
//! logged and replaced by the fallback stores plus a human-readable warning.

use std::path::PathBuf;

use popmap_core::{normalize_stores, AppConfig, StoreRecord, StoreSession};
use serde::Serialize;

use crate::client::SnapshotClient;
use crate::error::SourceError;
use crate::fallback::load_fallback;
use crate::tracker::LoadTicket;

/// Where live store data comes from.
#[derive(Debug, Clone)]
pub enum SnapshotSource {
    Url(SnapshotClient),
    File(PathBuf),
}

impl SnapshotSource {
    /// URL or path, for logs and warnings.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            SnapshotSource::Url(client) => client.url().to_string(),
            SnapshotSource::File(path) => path.display().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadOrigin {
    Live,
    Fallback,
}

impl LoadOrigin {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LoadOrigin::Live => "live",
            LoadOrigin::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for LoadOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one load. `warning` is set exactly when `origin` is
/// [`LoadOrigin::Fallback`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub stores: Vec<StoreRecord>,
    pub origin: LoadOrigin,
    pub warning: Option<String>,
}

impl LoadOutcome {
    fn live(stores: Vec<StoreRecord>) -> Self {
        Self {
            stores,
            origin: LoadOrigin::Live,
            warning: None,
        }
    }

    fn fallback(stores: Vec<StoreRecord>, warning: String) -> Self {
        Self {
            stores,
            origin: LoadOrigin::Fallback,
            warning: Some(warning),
        }
    }

    /// Hands the records to a session, marking fallback data as such.
    pub fn apply_to(self, session: &mut StoreSession) {
        session.apply_load(self.stores, self.warning);
    }
}

#[derive(Debug, Clone)]
pub struct StoreLoader {
    source: SnapshotSource,
    fallback: Vec<StoreRecord>,
}

impl StoreLoader {
    #[must_use]
    pub fn new(source: SnapshotSource, fallback: Vec<StoreRecord>) -> Self {
        Self { source, fallback }
    }

    /// Builds a loader from configuration: the snapshot URL when set,
    /// otherwise the snapshot file, with the configured or bundled fallback.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        let source = match &config.snapshot_url {
            Some(url) => SnapshotSource::Url(SnapshotClient::new(
                url,
                config.request_timeout_secs,
                &config.user_agent,
            )?),
            None => SnapshotSource::File(config.snapshot_path.clone()),
        };
        let fallback = load_fallback(config.fallback_path.as_deref());
        Ok(Self::new(source, fallback))
    }

    #[must_use]
    pub fn source(&self) -> &SnapshotSource {
        &self.source
    }

    /// Reads the raw snapshot without substituting fallback data.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on network, status, file, or JSON failure.
    pub async fn fetch_raw(&self) -> Result<serde_json::Value, SourceError> {
        match &self.source {
            SnapshotSource::Url(client) => client.fetch().await,
            SnapshotSource::File(path) => {
                let content =
                    tokio::fs::read_to_string(path)
                        .await
                        .map_err(|e| SourceError::Io {
                            path: path.display().to_string(),
                            source: e,
                        })?;
                serde_json::from_str(&content).map_err(|e| SourceError::Deserialize {
                    context: path.display().to_string(),
                    source: e,
                })
            }
        }
    }

    /// Loads and normalizes the live snapshot, falling back on any failure.
    pub async fn load(&self) -> LoadOutcome {
        match self.fetch_raw().await {
            Ok(raw) => {
                let stores = normalize_stores(&raw);
                tracing::info!(
                    source = %self.source.describe(),
                    count = stores.len(),
                    "loaded store snapshot"
                );
                LoadOutcome::live(stores)
            }
            Err(e) => {
                tracing::warn!(
                    source = %self.source.describe(),
                    error = %e,
                    fallback_count = self.fallback.len(),
                    "store snapshot unavailable; using fallback stores"
                );
                LoadOutcome::fallback(self.fallback.clone(), e.to_string())
            }
        }
    }

    /// Like [`StoreLoader::load`], but returns `None` when `ticket` went
    /// stale while the load was in flight.
    pub async fn load_tracked(&self, ticket: &LoadTicket) -> Option<LoadOutcome> {
        let outcome = self.load().await;
        if ticket.is_current() {
            Some(outcome)
        } else {
            tracing::debug!(
                generation = ticket.generation(),
                "discarding superseded store load"
            );
            None
        }
    }
}
