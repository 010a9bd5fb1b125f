use thiserror::Error;

/// Errors raised while reading a store snapshot.
///
/// [`crate::StoreLoader::load`] turns every one of these into fallback data
/// plus a warning; they only surface directly through
/// [`crate::StoreLoader::fetch_raw`].
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The snapshot endpoint answered with a non-2xx status.
    #[error("snapshot fetch failed: {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid snapshot URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to read snapshot file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The body was not valid JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
