pub mod app_config;
pub mod collect_targets;
pub mod config;
pub mod filter;
pub mod links;
pub mod normalize;
pub mod session;
pub mod stores;
pub mod view;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, NaverCredentials};
pub use collect_targets::{load_collect_targets, CategoryTarget, CollectTargets, SearchWindow};
pub use config::{load_app_config, load_app_config_from_env};
pub use filter::{filter_stores, StoreFilter};
pub use links::{instagram_url, map_search_url};
pub use normalize::{normalize_store, normalize_stores};
pub use session::{LoadState, StoreSession};
pub use stores::{Category, StockStatus, StoreCategory, StoreRecord};
pub use view::{
    category_chips, format_price, status_label, CardDensity, CategoryChip, MapController, Theme,
    ViewConfig, Viewport,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read collect targets file {path}: {source}")]
    TargetsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse collect targets file: {0}")]
    TargetsFileParse(#[source] serde_yaml::Error),

    #[error("invalid collect targets: {0}")]
    Validation(String),
}
