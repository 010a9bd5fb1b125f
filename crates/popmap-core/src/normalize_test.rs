use serde_json::json;

use super::*;

// -----------------------------------------------------------------------
// Top-level shape
// -----------------------------------------------------------------------

#[test]
fn non_array_input_yields_no_records() {
    for raw in [
        json!(null),
        json!({"stores": []}),
        json!("stores"),
        json!(42),
        json!(true),
    ] {
        assert!(
            normalize_stores(&raw).is_empty(),
            "expected empty result for {raw}"
        );
    }
}

#[test]
fn malformed_elements_never_survive() {
    let raw = json!([
        null,
        1,
        "store",
        [],
        {},
        {"id": "1", "lat": 37.5, "lng": 127.0},
        {"id": 1.5, "lat": 37.5, "lng": 127.0},
        {"id": 2, "lat": null, "lng": 127.0},
        {"id": 3, "lat": 37.5},
        {"id": 4, "lat": 37.5, "lng": 127.0}
    ]);

    let stores = normalize_stores(&raw);
    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0].id, 4);
    assert!(stores.iter().all(|s| s.lat.is_finite() && s.lng.is_finite()));
}

#[test]
fn string_latitude_is_dropped() {
    let raw = json!([{"id": 5, "lat": "37.5", "lng": 127.0}]);
    assert!(normalize_stores(&raw).is_empty());
}

#[test]
fn whole_float_id_is_accepted() {
    let store = normalize_store(&json!({"id": 7.0, "lat": 37.5, "lng": 127.0})).unwrap();
    assert_eq!(store.id, 7);
}

#[test]
fn order_is_preserved() {
    let raw = json!([
        {"id": 3, "lat": 37.5, "lng": 127.0},
        {"id": 1, "lat": 37.5, "lng": 127.0},
        {"id": 2, "lat": 37.5, "lng": 127.0}
    ]);
    let ids: Vec<i64> = normalize_stores(&raw).iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
}

// -----------------------------------------------------------------------
// Category compatibility
// -----------------------------------------------------------------------

#[test]
fn singular_category_backfills_categories() {
    let store = normalize_store(&json!({
        "id": 1, "lat": 37.5, "lng": 127.0, "category": "cake"
    }))
    .unwrap();
    assert_eq!(store.categories, vec![StoreCategory::Cake]);
    assert_eq!(store.category, Some(StoreCategory::Cake));
}

#[test]
fn non_empty_categories_win_but_explicit_category_is_kept() {
    let store = normalize_store(&json!({
        "id": 1, "lat": 37.5, "lng": 127.0,
        "category": "cake", "categories": ["dubai"]
    }))
    .unwrap();
    assert_eq!(store.categories, vec![StoreCategory::Dubai]);
    assert_eq!(
        store.category,
        Some(StoreCategory::Cake),
        "explicit singular field takes precedence over categories[0]"
    );
}

#[test]
fn empty_categories_array_falls_back_to_singular() {
    let store = normalize_store(&json!({
        "id": 1, "lat": 37.5, "lng": 127.0,
        "category": "goguma", "categories": []
    }))
    .unwrap();
    assert_eq!(store.categories, vec![StoreCategory::Goguma]);
}

#[test]
fn derived_category_is_first_of_categories() {
    let store = normalize_store(&json!({
        "id": 1, "lat": 37.5, "lng": 127.0,
        "categories": ["bungeoppang", "cake"]
    }))
    .unwrap();
    assert_eq!(store.category, Some(StoreCategory::Bungeoppang));
}

#[test]
fn neither_field_yields_empty_categories() {
    let store = normalize_store(&json!({"id": 1, "lat": 37.5, "lng": 127.0})).unwrap();
    assert!(store.categories.is_empty());
    assert_eq!(store.category, None);
}

#[test]
fn empty_string_category_is_ignored() {
    let store = normalize_store(&json!({
        "id": 1, "lat": 37.5, "lng": 127.0, "category": ""
    }))
    .unwrap();
    assert!(store.categories.is_empty());
    assert_eq!(store.category, None);
}

#[test]
fn unknown_tags_are_skipped_but_record_kept() {
    let store = normalize_store(&json!({
        "id": 1, "lat": 37.5, "lng": 127.0,
        "categories": ["macaron", "cake", 3]
    }))
    .unwrap();
    assert_eq!(store.categories, vec![StoreCategory::Cake]);
}

// -----------------------------------------------------------------------
// Optional fields
// -----------------------------------------------------------------------

#[test]
fn optional_fields_are_coerced() {
    let store = normalize_store(&json!({
        "id": 9,
        "name": "연남 쿠키스팟",
        "address": "서울 마포구 연남동 12",
        "district": 42,
        "lat": 37.5659,
        "lng": 126.9246,
        "status": "soldout",
        "price": "5300",
        "rating": 4.7,
        "distance": "",
        "instagramHandle": "yeonnam_cookie_spot"
    }))
    .unwrap();

    assert_eq!(store.name, "연남 쿠키스팟");
    assert_eq!(store.address.as_deref(), Some("서울 마포구 연남동 12"));
    assert_eq!(store.district, None, "non-string district is dropped");
    assert_eq!(store.status, StockStatus::Soldout);
    assert_eq!(store.price, None, "numeric-looking string is not a price");
    assert_eq!(store.rating, Some(4.7));
    assert_eq!(store.distance, None, "empty distance counts as absent");
    assert_eq!(
        store.instagram_handle.as_deref(),
        Some("yeonnam_cookie_spot")
    );
}

#[test]
fn unknown_status_needs_verification() {
    let store = normalize_store(&json!({
        "id": 1, "lat": 37.5, "lng": 127.0, "status": "restocking"
    }))
    .unwrap();
    assert_eq!(store.status, StockStatus::Check);
}

#[test]
fn unmodeled_fields_are_preserved() {
    let store = normalize_store(&json!({
        "id": 1, "lat": 37.5, "lng": 127.0, "openUntil": "22:00", "menu": ["a"]
    }))
    .unwrap();
    assert_eq!(store.extra.get("openUntil"), Some(&json!("22:00")));
    assert_eq!(store.extra.get("menu"), Some(&json!(["a"])));
    assert!(!store.extra.contains_key("id"));
}
