//! Reading and writing the published `stores.json` snapshot.

use std::path::Path;

use popmap_core::{normalize_stores, StoreRecord};

use crate::error::CollectorError;

/// Reads the current snapshot. A missing file starts an empty catalog.
///
/// # Errors
///
/// Returns [`CollectorError::SnapshotIo`] if the file exists but cannot be
/// read, or [`CollectorError::SnapshotDecode`] if it is not valid JSON.
pub fn read_snapshot(path: &Path) -> Result<Vec<StoreRecord>, CollectorError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no existing snapshot; starting empty");
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(CollectorError::SnapshotIo {
                path: path.display().to_string(),
                source: e,
            })
        }
    };

    let raw = serde_json::from_str::<serde_json::Value>(&content).map_err(|e| {
        CollectorError::SnapshotDecode {
            path: path.display().to_string(),
            source: e,
        }
    })?;
    Ok(normalize_stores(&raw))
}

/// Writes `stores` as pretty-printed JSON, creating parent directories.
///
/// # Errors
///
/// Returns [`CollectorError::SnapshotEncode`] if serialization fails, or
/// [`CollectorError::SnapshotIo`] if the file cannot be written.
pub fn write_snapshot(path: &Path, stores: &[StoreRecord]) -> Result<(), CollectorError> {
    let io_err = |e: std::io::Error| CollectorError::SnapshotIo {
        path: path.display().to_string(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut body = serde_json::to_string_pretty(stores).map_err(CollectorError::SnapshotEncode)?;
    body.push('\n');
    std::fs::write(path, body).map_err(io_err)
}
