use serde::{Deserialize, Serialize};

/// Response body of `GET /v1/search/local.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalSearchResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub items: Vec<LocalItem>,
}

/// One place returned by local search.
///
/// `title` may contain `<b>` highlight tags. `mapx`/`mapy` are WGS84
/// longitude/latitude scaled by 10^7, sent as strings or numbers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub road_address: String,
    #[serde(default)]
    pub mapx: Option<serde_json::Value>,
    #[serde(default)]
    pub mapy: Option<serde_json::Value>,
}

impl LocalItem {
    /// Road address when present, else the lot address, trimmed.
    #[must_use]
    pub fn best_address(&self) -> &str {
        let road = self.road_address.trim();
        if road.is_empty() {
            self.address.trim()
        } else {
            road
        }
    }
}
