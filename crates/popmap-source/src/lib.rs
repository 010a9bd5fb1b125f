//! Store snapshot sources: the live HTTP or file snapshot, the fallback
//! set, and stale-load tracking.

pub mod client;
pub mod error;
pub mod fallback;
pub mod loader;
pub mod tracker;

pub use client::SnapshotClient;
pub use error::SourceError;
pub use fallback::{bundled_fallback, load_fallback};
pub use loader::{LoadOrigin, LoadOutcome, SnapshotSource, StoreLoader};
pub use tracker::{LoadTicket, LoadTracker};
