//! HTTP client for the Naver local search API.

use std::time::Duration;

use popmap_core::NaverCredentials;
use reqwest::{Client, Url};

use crate::error::CollectorError;
use crate::rate_limit::retry_with_backoff;
use crate::types::{LocalItem, LocalSearchResponse};

const DEFAULT_BASE_URL: &str = "https://openapi.naver.com/";
const LOCAL_SEARCH_PATH: &str = "v1/search/local.json";

/// Local search client with credential headers and retry policy.
///
/// Transient errors (429, 5xx, network failures) are retried with jittered
/// exponential backoff up to `max_retries` additional attempts.
pub struct NaverLocalClient {
    client: Client,
    base_url: Url,
    credentials: NaverCredentials,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl NaverLocalClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        credentials: NaverCredentials,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, CollectorError> {
        Self::with_base_url(
            credentials,
            timeout_secs,
            user_agent,
            max_retries,
            backoff_base_ms,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the client cannot be built, or
    /// [`CollectorError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        credentials: NaverCredentials,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
        base_url: &str,
    ) -> Result<Self, CollectorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| CollectorError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            credentials,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Runs one local search page, ordered by similarity.
    ///
    /// # Errors
    ///
    /// - [`CollectorError::RateLimited`] on HTTP 429 after all retries.
    /// - [`CollectorError::UnexpectedStatus`] on any other non-2xx status
    ///   (5xx retried, 4xx not).
    /// - [`CollectorError::Http`] on network failure after all retries.
    /// - [`CollectorError::Deserialize`] if the body does not parse.
    pub async fn search_local(
        &self,
        query: &str,
        start: u32,
        display: u32,
    ) -> Result<Vec<LocalItem>, CollectorError> {
        let url = self.search_url(query, start, display)?;

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(url.clone())
                    .header("X-Naver-Client-Id", &self.credentials.client_id)
                    .header("X-Naver-Client-Secret", &self.credentials.client_secret)
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(1);
                    return Err(CollectorError::RateLimited { retry_after_secs });
                }

                if !status.is_success() {
                    return Err(CollectorError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                let body = response.text().await?;
                let parsed = serde_json::from_str::<LocalSearchResponse>(&body).map_err(|e| {
                    CollectorError::Deserialize {
                        context: format!("local search for \"{query}\" start={start}"),
                        source: e,
                    }
                })?;

                Ok(parsed.items)
            }
        })
        .await
    }

    /// Builds the search URL with percent-encoded query parameters.
    fn search_url(&self, query: &str, start: u32, display: u32) -> Result<Url, CollectorError> {
        let mut url =
            self.base_url
                .join(LOCAL_SEARCH_PATH)
                .map_err(|e| CollectorError::InvalidBaseUrl {
                    url: self.base_url.to_string(),
                    reason: e.to_string(),
                })?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("display", &display.to_string())
            .append_pair("start", &start.to_string())
            .append_pair("sort", "sim");
        Ok(url)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
