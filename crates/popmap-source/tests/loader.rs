//! Integration tests for `StoreLoader` using wiremock HTTP mocks.

use std::io::Write;

use popmap_core::{LoadState, StoreSession};
use popmap_source::{
    bundled_fallback, LoadOrigin, LoadTracker, SnapshotClient, SnapshotSource, StoreLoader,
};
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn url_loader(base_url: &str) -> StoreLoader {
    let client = SnapshotClient::new(&format!("{base_url}/stores.json"), 5, "popmap-test/0.1")
        .expect("client construction should not fail");
    StoreLoader::new(SnapshotSource::Url(client), bundled_fallback())
}

fn snapshot() -> serde_json::Value {
    serde_json::json!([
        {"id": 10, "name": "성수 붕어빵", "lat": 37.5446, "lng": 127.0557, "category": "bungeoppang"},
        {"id": 11, "name": "bad coords", "lat": "37.5", "lng": 127.0},
        {"id": 12, "name": "강남 케이크", "lat": 37.4979, "lng": 127.0276, "categories": ["cake"]}
    ])
}

#[tokio::test]
async fn live_snapshot_is_normalized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stores.json"))
        .and(header_exists("cache-control"))
        .and(header("pragma", "no-cache"))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot()))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = url_loader(&server.uri()).load().await;

    assert_eq!(outcome.origin, LoadOrigin::Live);
    assert!(outcome.warning.is_none());
    let ids: Vec<i64> = outcome.stores.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![10, 12]);
    assert_eq!(outcome.stores[0].categories.len(), 1);

    let requests = server.received_requests().await.expect("recording enabled");
    let cache_control = requests[0]
        .headers
        .get("cache-control")
        .and_then(|v| v.to_str().ok());
    assert_eq!(cache_control, Some("no-cache, no-store"));
}

#[tokio::test]
async fn every_request_carries_a_timestamp() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stores.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot()))
        .mount(&server)
        .await;

    let loader = url_loader(&server.uri());
    loader.load().await;
    loader.load().await;

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 2);
    for request in requests {
        let ts = request
            .url
            .query_pairs()
            .find(|(k, _)| k == "ts")
            .map(|(_, v)| v.into_owned())
            .expect("ts parameter present");
        assert!(ts.parse::<i64>().is_ok_and(|millis| millis > 0), "ts={ts}");
    }
}

#[tokio::test]
async fn server_error_substitutes_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stores.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let outcome = url_loader(&server.uri()).load().await;

    assert_eq!(outcome.origin, LoadOrigin::Fallback);
    assert_eq!(outcome.stores, bundled_fallback());
    let warning = outcome.warning.expect("fallback carries a warning");
    assert!(warning.contains("503"), "warning: {warning}");
}

#[tokio::test]
async fn undecodable_body_substitutes_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stores.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let outcome = url_loader(&server.uri()).load().await;
    assert_eq!(outcome.origin, LoadOrigin::Fallback);
    assert!(outcome.warning.is_some());
}

#[tokio::test]
async fn connection_failure_substitutes_fallback() {
    // Nothing listens on the discard port.
    let outcome = url_loader("http://127.0.0.1:9").load().await;
    assert_eq!(outcome.origin, LoadOrigin::Fallback);
    assert_eq!(outcome.stores.len(), 2);
    assert!(outcome.warning.is_some());
}

#[tokio::test]
async fn non_array_payload_is_live_and_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stores.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"stores": []})))
        .mount(&server)
        .await;

    let outcome = url_loader(&server.uri()).load().await;
    assert_eq!(outcome.origin, LoadOrigin::Live);
    assert!(outcome.stores.is_empty());
    assert!(outcome.warning.is_none());
}

#[tokio::test]
async fn file_source_reads_local_snapshot() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", snapshot()).unwrap();

    let loader = StoreLoader::new(
        SnapshotSource::File(file.path().to_path_buf()),
        bundled_fallback(),
    );
    let outcome = loader.load().await;
    assert_eq!(outcome.origin, LoadOrigin::Live);
    assert_eq!(outcome.stores.len(), 2);
}

#[tokio::test]
async fn missing_file_substitutes_fallback() {
    let loader = StoreLoader::new(
        SnapshotSource::File("/nonexistent/stores.json".into()),
        bundled_fallback(),
    );
    let outcome = loader.load().await;
    assert_eq!(outcome.origin, LoadOrigin::Fallback);
    assert!(outcome
        .warning
        .as_deref()
        .is_some_and(|w| w.contains("/nonexistent/stores.json")));
}

#[tokio::test]
async fn stale_ticket_result_is_discarded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stores.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot()))
        .mount(&server)
        .await;

    let loader = url_loader(&server.uri());
    let tracker = LoadTracker::new();

    let stale = tracker.begin();
    let current = tracker.begin();
    assert!(loader.load_tracked(&stale).await.is_none());

    let mut session = StoreSession::default();
    let outcome = loader
        .load_tracked(&current)
        .await
        .expect("current ticket applies");
    outcome.apply_to(&mut session);
    assert_eq!(session.load_state(), &LoadState::Ready);
    assert_eq!(session.visible().len(), 2);

    let torn_down = tracker.begin();
    tracker.cancel_all();
    assert!(loader.load_tracked(&torn_down).await.is_none());
}

#[tokio::test]
async fn fallback_outcome_marks_session() {
    let loader = StoreLoader::new(
        SnapshotSource::File("/nonexistent/stores.json".into()),
        bundled_fallback(),
    );
    let mut session = StoreSession::default();
    loader.load().await.apply_to(&mut session);
    assert!(session.warning().is_some());
    assert_eq!(session.stores().len(), 2);
}
