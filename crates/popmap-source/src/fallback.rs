//! Stores shown when the live snapshot cannot be read.

use std::path::Path;

use popmap_core::{normalize_stores, StoreRecord};

const BUNDLED: &str = include_str!("../data/fallback_stores.json");

/// The stores compiled into the binary.
#[must_use]
pub fn bundled_fallback() -> Vec<StoreRecord> {
    match serde_json::from_str(BUNDLED) {
        Ok(raw) => normalize_stores(&raw),
        Err(e) => {
            tracing::error!(error = %e, "bundled fallback stores are not valid JSON");
            Vec::new()
        }
    }
}

/// Reads fallback stores from `path`, or the bundled set when `path` is
/// `None` or unreadable.
#[must_use]
pub fn load_fallback(path: Option<&Path>) -> Vec<StoreRecord> {
    let Some(path) = path else {
        return bundled_fallback();
    };

    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| {
            serde_json::from_str::<serde_json::Value>(&content).map_err(|e| e.to_string())
        });

    match parsed {
        Ok(raw) => normalize_stores(&raw),
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                %error,
                "fallback file unusable; using bundled stores"
            );
            bundled_fallback()
        }
    }
}
