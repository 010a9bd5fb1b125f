//! HTTP client for the published store snapshot.
//!
//! Every request carries a fresh `ts` query parameter and no-cache headers so
//! intermediate caches never serve a stale snapshot after the collector runs.

use std::time::Duration;

use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::{Client, Url};

use crate::error::SourceError;

/// Client for a single snapshot URL.
///
/// Use [`SnapshotClient::new`] with the configured URL, or point it at a
/// wiremock server in tests.
#[derive(Debug, Clone)]
pub struct SnapshotClient {
    client: Client,
    url: Url,
}

impl SnapshotClient {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SourceError::InvalidUrl`] if `url` does
    /// not parse.
    pub fn new(url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let url = Url::parse(url).map_err(|e| SourceError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, url })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetches the snapshot and parses the body as JSON.
    ///
    /// The body shape is not checked here; normalization decides what a
    /// usable snapshot is.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Http`] on network failure.
    /// - [`SourceError::UnexpectedStatus`] on a non-2xx status.
    /// - [`SourceError::Deserialize`] if the body is not valid JSON.
    pub async fn fetch(&self) -> Result<serde_json::Value, SourceError> {
        let url = self.build_url(chrono::Utc::now().timestamp_millis());
        tracing::debug!(%url, "fetching store snapshot");

        let response = self
            .client
            .get(url.clone())
            .header(CACHE_CONTROL, "no-cache, no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
            context: self.url.to_string(),
            source: e,
        })
    }

    /// Appends the cache-busting `ts` parameter, keeping any existing query.
    fn build_url(&self, ts_millis: i64) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("ts", &ts_millis.to_string());
        url
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
