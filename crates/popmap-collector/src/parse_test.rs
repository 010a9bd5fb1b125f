use serde_json::json;

use super::*;

#[test]
fn clean_html_strips_highlight_tags() {
    assert_eq!(clean_html("<b>성수</b> 붕어빵 "), "성수 붕어빵");
    assert_eq!(clean_html("plain"), "plain");
    assert_eq!(clean_html(""), "");
}

#[test]
fn clean_html_is_non_greedy() {
    assert_eq!(clean_html("<b>a</b> and <b>b</b>"), "a and b");
}

#[test]
fn normalize_key_folds_case_and_whitespace() {
    let a = normalize_key("Cafe  Mettle", " 서울 마포구   연남동 ", 37.566_401, 126.925_3);
    let b = normalize_key("cafe mettle", "서울 마포구 연남동", 37.566_404, 126.925_300_2);
    assert_eq!(a, b);
    assert_eq!(a, "cafe mettle|서울 마포구 연남동|37.56640|126.92530");
}

#[test]
fn normalize_key_distinguishes_locations() {
    let a = normalize_key("붕어빵", "서울 마포구", 37.5664, 126.9253);
    let b = normalize_key("붕어빵", "서울 마포구", 37.5674, 126.9253);
    assert_ne!(a, b);
}

#[test]
fn district_from_seoul_address() {
    assert_eq!(
        district_from("서울특별시 마포구 연남동 12").as_deref(),
        Some("마포구")
    );
    assert_eq!(district_from("서울 성동구").as_deref(), Some("성동구"));
    assert_eq!(district_from("경기도 성남시 분당구"), None);
    assert_eq!(district_from("서울"), None);
    assert_eq!(district_from(""), None);
}

#[test]
fn seoul_address_check() {
    assert!(is_seoul_address("서울특별시 강남구"));
    assert!(is_seoul_address("대한민국 서울 강남구"));
    assert!(!is_seoul_address("부산광역시 해운대구"));
}

#[test]
fn latlng_parses_scaled_strings() {
    let pos = try_parse_latlng(Some(&json!("1269253000")), Some(&json!("375664000")));
    assert_eq!(pos, Some((37.5664, 126.9253)));
}

#[test]
fn latlng_parses_numbers_and_rounds() {
    let pos = try_parse_latlng(Some(&json!(1_270_557_123_i64)), Some(&json!(375_446_789_i64)));
    assert_eq!(pos, Some((37.544_679, 127.055_712)));
}

#[test]
fn latlng_rejects_outside_seoul_box() {
    // Busan
    assert_eq!(
        try_parse_latlng(Some(&json!("1291600000")), Some(&json!("351800000"))),
        None
    );
    // Legacy KATECH coordinates are far outside the scaled range.
    assert_eq!(
        try_parse_latlng(Some(&json!("310000")), Some(&json!("552000"))),
        None
    );
}

#[test]
fn latlng_rejects_missing_or_garbage() {
    assert_eq!(try_parse_latlng(None, Some(&json!("375664000"))), None);
    assert_eq!(
        try_parse_latlng(Some(&json!("abc")), Some(&json!("375664000"))),
        None
    );
    assert_eq!(
        try_parse_latlng(Some(&json!(null)), Some(&json!("375664000"))),
        None
    );
}
