//! Store records and the closed category vocabulary they are tagged with.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stock state of a store, as reported in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Available,
    Soldout,
    /// Stock has not been confirmed recently and needs verification.
    Check,
}

impl StockStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StockStatus::Available => "available",
            StockStatus::Soldout => "soldout",
            StockStatus::Check => "check",
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(StockStatus::Available),
            "soldout" => Ok(StockStatus::Soldout),
            "check" => Ok(StockStatus::Check),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown stock status: {0}")]
pub struct UnknownStatus(pub String);

/// A concrete category tag that can be stored on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreCategory {
    Dubai,
    Bungeoppang,
    Goguma,
    Cake,
}

impl StoreCategory {
    /// All tags in display order.
    pub const ALL: [StoreCategory; 4] = [
        StoreCategory::Dubai,
        StoreCategory::Bungeoppang,
        StoreCategory::Goguma,
        StoreCategory::Cake,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StoreCategory::Dubai => "dubai",
            StoreCategory::Bungeoppang => "bungeoppang",
            StoreCategory::Goguma => "goguma",
            StoreCategory::Cake => "cake",
        }
    }
}

impl std::fmt::Display for StoreCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// Category selector. `All` is a filter value only and never stored on a
/// record, so it is kept out of [`StoreCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    #[default]
    All,
    Only(StoreCategory),
}

impl Category {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Only(tag) => tag.as_str(),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Category::All);
        }
        s.parse().map(Category::Only)
    }
}

impl TryFrom<String> for Category {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

impl From<StoreCategory> for Category {
    fn from(value: StoreCategory) -> Self {
        Category::Only(value)
    }
}

/// One normalized point-of-sale entry.
///
/// Only produced by [`crate::normalize_stores`]; every instance has an
/// integer `id` and finite coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRecord {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub status: StockStatus,
    /// Price in KRW. Absent when the snapshot carried no usable number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default)]
    pub categories: Vec<StoreCategory>,
    /// Legacy singular category, kept for older consumers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<StoreCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Pre-rendered distance label such as `"350m"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram_handle: Option<String>,
    /// Fields of the source object this type does not model.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl StoreRecord {
    #[must_use]
    pub fn has_category(&self, tag: StoreCategory) -> bool {
        self.categories.contains(&tag)
    }

    /// First tag in `categories`, used for marker icons and card emoji.
    #[must_use]
    pub fn primary_category(&self) -> Option<StoreCategory> {
        self.categories.first().copied()
    }

    /// `name`, `address` and `district` joined by single spaces, skipping
    /// empty parts.
    #[must_use]
    pub fn search_text(&self) -> String {
        [
            Some(self.name.as_str()),
            self.address.as_deref(),
            self.district.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> StoreRecord {
        StoreRecord {
            id: 1,
            name: "카페 메틀".to_string(),
            address: Some("서울 마포구 연남동".to_string()),
            district: None,
            lat: 37.5664,
            lng: 126.9253,
            status: StockStatus::Available,
            price: Some(5500.0),
            categories: vec![StoreCategory::Dubai, StoreCategory::Cake],
            category: Some(StoreCategory::Dubai),
            rating: None,
            distance: None,
            instagram_handle: Some("cafe_mettle".to_string()),
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn category_parses_all_and_tags() {
        assert_eq!("all".parse::<Category>().unwrap(), Category::All);
        assert_eq!(
            "goguma".parse::<Category>().unwrap(),
            Category::Only(StoreCategory::Goguma)
        );
        assert!("Cake".parse::<Category>().is_err(), "match is case-sensitive");
    }

    #[test]
    fn category_serializes_as_plain_string() {
        let json = serde_json::to_string(&Category::Only(StoreCategory::Cake)).unwrap();
        assert_eq!(json, "\"cake\"");
        let back: Category = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(back, Category::All);
    }

    #[test]
    fn search_text_skips_missing_parts() {
        assert_eq!(record().search_text(), "카페 메틀 서울 마포구 연남동");
    }

    #[test]
    fn record_serializes_camel_case_and_extra_fields() {
        let mut rec = record();
        rec.extra
            .insert("openUntil".to_string(), serde_json::json!("22:00"));
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["instagramHandle"], "cafe_mettle");
        assert_eq!(value["openUntil"], "22:00");
        assert_eq!(value["categories"], serde_json::json!(["dubai", "cake"]));
        assert!(value.get("district").is_none());
    }

    #[test]
    fn primary_category_is_first_tag() {
        assert_eq!(record().primary_category(), Some(StoreCategory::Dubai));
        assert!(record().has_category(StoreCategory::Cake));
        assert!(!record().has_category(StoreCategory::Goguma));
    }
}
