//! Field extraction from local search results.

use std::sync::LazyLock;

use regex::Regex;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<.*?>").expect("valid regex"));

/// Latitude band accepted as Seoul.
const LAT_RANGE: (f64, f64) = (37.3, 37.8);
/// Longitude band accepted as Seoul.
const LNG_RANGE: (f64, f64) = (126.7, 127.3);
const COORD_SCALE: f64 = 1e7;

/// Strips HTML tags (search highlights such as `<b>`) and trims.
#[must_use]
pub fn clean_html(s: &str) -> String {
    HTML_TAG.replace_all(s, "").trim().to_string()
}

/// Dedup key: case-folded, whitespace-collapsed name and address plus
/// coordinates rounded to five decimals.
#[must_use]
pub fn normalize_key(name: &str, address: &str, lat: f64, lng: f64) -> String {
    format!(
        "{}|{}|{lat:.5}|{lng:.5}",
        collapse_whitespace(name).to_lowercase(),
        collapse_whitespace(address).to_lowercase(),
    )
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// District (`구`) from a Seoul address such as `서울특별시 마포구 연남동`.
#[must_use]
pub fn district_from(address: &str) -> Option<String> {
    let mut parts = address.split_whitespace();
    let city = parts.next()?;
    let district = parts.next()?;
    city.starts_with("서울").then(|| district.to_string())
}

/// `true` when the address mentions Seoul anywhere.
#[must_use]
pub fn is_seoul_address(address: &str) -> bool {
    address.contains("서울")
}

/// Converts scaled `mapx`/`mapy` into `(lat, lng)` rounded to six decimals.
///
/// Returns `None` when either value is missing, not numeric, or outside the
/// Seoul bounding box.
#[must_use]
pub fn try_parse_latlng(
    mapx: Option<&serde_json::Value>,
    mapy: Option<&serde_json::Value>,
) -> Option<(f64, f64)> {
    let lng = scaled(mapx?)?;
    let lat = scaled(mapy?)?;

    let in_box = (LAT_RANGE.0..=LAT_RANGE.1).contains(&lat)
        && (LNG_RANGE.0..=LNG_RANGE.1).contains(&lng);
    in_box.then(|| (round6(lat), round6(lng)))
}

fn scaled(value: &serde_json::Value) -> Option<f64> {
    let raw = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    let scaled = raw / COORD_SCALE;
    scaled.is_finite().then_some(scaled)
}

fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
