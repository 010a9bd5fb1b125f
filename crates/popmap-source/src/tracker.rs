//! Generation counter that invalidates superseded loads.
//!
//! A load begun before a newer one, or before its owner shut down, must not
//! overwrite fresher state. Callers take a [`LoadTicket`] before starting and
//! check it before applying the result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct LoadTracker {
    generation: Arc<AtomicU64>,
}

impl LoadTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new load, making every earlier ticket stale.
    #[must_use]
    pub fn begin(&self) -> LoadTicket {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        LoadTicket {
            generation,
            tracker: Arc::clone(&self.generation),
        }
    }

    /// Makes every outstanding ticket stale. Used on teardown.
    pub fn cancel_all(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

/// Handle for one in-flight load.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    generation: u64,
    tracker: Arc<AtomicU64>,
}

impl LoadTicket {
    /// `true` while no newer load has begun and the tracker was not cancelled.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.tracker.load(Ordering::Acquire) == self.generation
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
