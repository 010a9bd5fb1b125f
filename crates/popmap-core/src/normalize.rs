//! Coercion of raw snapshot JSON into [`StoreRecord`]s.
//!
//! Snapshots in the wild carry several shapes: the legacy singular
//! `category` field, the newer `categories` array, both, or neither, plus
//! whatever the collector or a hand edit left behind. Everything here is
//! total: malformed elements are dropped, never reported as errors.

use serde_json::{Map, Value};

use crate::stores::{StockStatus, StoreCategory, StoreRecord};

/// Keys lifted into typed fields; everything else lands in `extra`.
const MODELED_KEYS: &[&str] = &[
    "id",
    "name",
    "address",
    "district",
    "lat",
    "lng",
    "status",
    "price",
    "categories",
    "category",
    "rating",
    "distance",
    "instagramHandle",
];

/// Normalizes a raw snapshot into store records, preserving input order.
///
/// A non-array `raw` is treated as an empty snapshot.
#[must_use]
pub fn normalize_stores(raw: &Value) -> Vec<StoreRecord> {
    let Some(items) = raw.as_array() else {
        tracing::debug!("store snapshot is not an array; treating it as empty");
        return Vec::new();
    };

    let stores: Vec<StoreRecord> = items.iter().filter_map(normalize_store).collect();

    let dropped = items.len() - stores.len();
    if dropped > 0 {
        tracing::debug!(
            kept = stores.len(),
            dropped,
            "dropped store records without an integer id or finite coordinates"
        );
    }

    stores
}

/// Normalizes one raw element. Returns `None` when the element is not an
/// object, lacks an integer `id`, or lacks finite numeric `lat`/`lng`.
#[must_use]
pub fn normalize_store(raw: &Value) -> Option<StoreRecord> {
    let obj = raw.as_object()?;

    let id = integer(obj.get("id")?)?;
    let lat = finite_number(obj.get("lat")?)?;
    let lng = finite_number(obj.get("lng")?)?;

    let categories = categories_of(obj);
    // The record's own `category` wins over the first computed tag when both
    // exist. Downstream markers read this field, so the order is kept as the
    // snapshot format has always had it.
    let category = obj
        .get("category")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<StoreCategory>().ok())
        .or_else(|| categories.first().copied());

    let extra: Map<String, Value> = obj
        .iter()
        .filter(|(key, _)| !MODELED_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Some(StoreRecord {
        id,
        name: text(obj.get("name")).unwrap_or_default(),
        address: text(obj.get("address")),
        district: text(obj.get("district")),
        lat,
        lng,
        status: obj
            .get("status")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or(StockStatus::Check),
        price: obj.get("price").and_then(finite_number),
        categories,
        category,
        rating: obj.get("rating").and_then(finite_number),
        distance: non_empty_text(obj.get("distance")),
        instagram_handle: non_empty_text(obj.get("instagramHandle")),
        extra,
    })
}

/// Computes the tag list: a non-empty `categories` array as given, else the
/// singular `category` wrapped in a list, else nothing. Tags outside the
/// closed vocabulary are skipped.
fn categories_of(obj: &Map<String, Value>) -> Vec<StoreCategory> {
    let source: Vec<&Value> = match obj.get("categories") {
        Some(Value::Array(items)) if !items.is_empty() => items.iter().collect(),
        _ => obj
            .get("category")
            .filter(|v| is_truthy(v))
            .into_iter()
            .collect(),
    };

    let mut tags = Vec::with_capacity(source.len());
    for value in source {
        match value.as_str().map(str::parse::<StoreCategory>) {
            Some(Ok(tag)) => tags.push(tag),
            _ => tracing::debug!(tag = %value, "skipping unrecognized category tag"),
        }
    }
    tags
}

fn integer(value: &Value) -> Option<i64> {
    let number = value.as_number()?;
    if let Some(i) = number.as_i64() {
        return Some(i);
    }
    let f = number.as_f64()?;
    // Whole floats such as `7.0` still count as integer ids.
    #[allow(clippy::float_cmp)]
    let whole = f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15;
    #[allow(clippy::cast_possible_truncation)]
    let id = f as i64;
    whole.then_some(id)
}

fn finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|f| f.is_finite())
}

fn text(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

fn non_empty_text(value: Option<&Value>) -> Option<String> {
    text(value).filter(|s| !s.trim().is_empty())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
