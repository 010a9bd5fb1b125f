pub mod catalog;
pub mod client;
pub mod collector;
pub mod error;
pub mod parse;
pub(crate) mod rate_limit;
pub mod snapshot;
pub mod types;

pub use catalog::{Candidate, Catalog, Offer};
pub use client::NaverLocalClient;
pub use collector::{CollectSummary, Collector};
pub use error::CollectorError;
pub use snapshot::{read_snapshot, write_snapshot};
pub use types::{LocalItem, LocalSearchResponse};
