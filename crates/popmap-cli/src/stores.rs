//! Read-only snapshot commands: `stores list`, `stores show`, `stores validate`.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use popmap_core::view::category_emoji;
use popmap_core::{
    format_price, instagram_url, map_search_url, normalize_store, status_label, AppConfig,
    Category, StoreRecord, StoreSession, ViewConfig,
};
use popmap_source::{load_fallback, LoadOutcome, SnapshotSource, StoreLoader};

/// Sub-commands available under `stores`.
#[derive(Debug, Subcommand)]
pub enum StoresCommands {
    /// List stores passing the category and text filters
    List {
        /// Category tag (`dubai`, `bungeoppang`, `goguma`, `cake`) or `all`
        #[arg(long, default_value = "all")]
        category: Category,
        /// Case-insensitive text matched against name, address and district
        #[arg(long, short)]
        query: Option<String>,
        /// Maximum number of stores to print
        #[arg(long)]
        limit: Option<usize>,
        /// Read this snapshot file instead of the configured source
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Show one store with its display fields and links
    Show {
        id: i64,
        /// Read this snapshot file instead of the configured source
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Check a snapshot file and report records that would be dropped
    Validate {
        /// Snapshot to check (defaults to `POPMAP_SNAPSHOT_PATH`)
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn loader_for(config: &AppConfig, file: Option<PathBuf>) -> anyhow::Result<StoreLoader> {
    Ok(match file {
        Some(path) => StoreLoader::new(
            SnapshotSource::File(path),
            load_fallback(config.fallback_path.as_deref()),
        ),
        None => StoreLoader::from_config(config)?,
    })
}

/// Loads the snapshot into a session, printing the fallback warning if any.
async fn load_session(loader: &StoreLoader, view: ViewConfig) -> StoreSession {
    let outcome: LoadOutcome = loader.load().await;
    let mut session = StoreSession::new(view);
    outcome.apply_to(&mut session);
    if let Some(warning) = session.warning() {
        eprintln!("warning: {warning}");
    }
    session
}

pub(crate) async fn run_stores_list(
    config: &AppConfig,
    file: Option<PathBuf>,
    category: Category,
    query: Option<&str>,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let loader = loader_for(config, file)?;
    let mut session = load_session(&loader, config.view.clone()).await;
    session.set_category(category);
    if let Some(query) = query {
        session.set_query(query);
    }

    let (shown, matching) = list_page(&session, limit);
    for store in &shown {
        println!("{}", format_row(store));
    }
    println!("{} of {matching} matching stores shown", shown.len());
    Ok(())
}

/// Filtered stores up to `limit`, with the full match count. The marker cap
/// is a map concern and does not shorten the list.
fn list_page(session: &StoreSession, limit: Option<usize>) -> (Vec<&StoreRecord>, usize) {
    let visible = session.visible();
    let matching = visible.len();
    let shown = visible
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .collect();
    (shown, matching)
}

pub(crate) async fn run_stores_show(
    config: &AppConfig,
    file: Option<PathBuf>,
    id: i64,
) -> anyhow::Result<()> {
    let loader = loader_for(config, file)?;
    let mut session = load_session(&loader, config.view.clone()).await;
    let Some(store) = session.select_store(id) else {
        anyhow::bail!("store {id} not found");
    };
    println!("{}", format_detail(store));
    Ok(())
}

/// Fails only when the file is unreadable or not JSON; dropped records are
/// reported, not fatal.
pub(crate) fn run_stores_validate(path: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("{} is not valid JSON: {e}", path.display()))?;

    let report = validate_snapshot(&raw);
    if !report.is_array {
        println!("{}: top-level value is not an array; it loads as zero stores", path.display());
        return Ok(());
    }
    for index in &report.dropped {
        println!("record #{index}: dropped (missing integer id or numeric lat/lng)");
    }
    println!(
        "{}: {} records, {} valid, {} dropped",
        path.display(),
        report.total,
        report.valid,
        report.dropped.len()
    );
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
struct ValidationReport {
    is_array: bool,
    total: usize,
    valid: usize,
    /// Zero-based positions of records the normalizer rejects.
    dropped: Vec<usize>,
}

fn validate_snapshot(raw: &serde_json::Value) -> ValidationReport {
    let Some(items) = raw.as_array() else {
        return ValidationReport {
            is_array: false,
            total: 0,
            valid: 0,
            dropped: Vec::new(),
        };
    };

    let dropped: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| normalize_store(item).is_none())
        .map(|(index, _)| index)
        .collect();

    ValidationReport {
        is_array: true,
        total: items.len(),
        valid: items.len() - dropped.len(),
        dropped,
    }
}

fn format_row(store: &StoreRecord) -> String {
    let emoji = store.primary_category().map_or(" ", category_emoji);
    format!(
        "{:>5}  {emoji} {}  [{}]  {}  {}",
        store.id,
        store.name,
        status_label(store.status),
        format_price(store.price),
        store.district.as_deref().unwrap_or("-"),
    )
}

fn format_detail(store: &StoreRecord) -> String {
    let tags: Vec<&str> = store.categories.iter().map(|c| c.as_str()).collect();
    let mut lines = vec![
        format!("#{} {}", store.id, store.name),
        format!("address:    {}", store.address.as_deref().unwrap_or("-")),
        format!("status:     {}", status_label(store.status)),
        format!("price:      {}", format_price(store.price)),
        format!("categories: {}", tags.join(", ")),
        format!("location:   {:.6}, {:.6}", store.lat, store.lng),
    ];
    if let Some(rating) = store.rating {
        lines.push(format!("rating:     {rating:.1}"));
    }
    if let Some(distance) = &store.distance {
        lines.push(format!("distance:   {distance}"));
    }
    lines.push(format!("map:        {}", map_search_url(store)));
    if let Some(url) = instagram_url(store) {
        lines.push(format!("instagram:  {url}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn mettle() -> StoreRecord {
        normalize_store(&json!({
            "id": 1, "name": "카페 메틀", "address": "서울 마포구 연남동", "district": "마포구",
            "lat": 37.5664, "lng": 126.9253, "status": "available", "price": 5500,
            "categories": ["dubai"], "rating": 4.8, "distance": "350m",
            "instagramHandle": "cafe_mettle"
        }))
        .unwrap()
    }

    #[test]
    fn list_ignores_marker_cap_but_honours_limit() {
        let mut session = StoreSession::new(ViewConfig {
            marker_cap: Some(1),
            ..ViewConfig::default()
        });
        session.apply_load(popmap_source::bundled_fallback(), None);

        let (shown, matching) = list_page(&session, None);
        assert_eq!(matching, 2);
        assert_eq!(shown.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(session.markers().len(), 1);

        let (shown, matching) = list_page(&session, Some(1));
        assert_eq!((shown.len(), matching), (1, 2));
    }

    #[test]
    fn validate_reports_dropped_positions() {
        let raw = json!([
            {"id": 1, "lat": 37.5, "lng": 127.0},
            {"id": 5, "lat": "37.5", "lng": 127.0},
            {"lat": 37.5, "lng": 127.0},
            {"id": 2, "lat": 37.6, "lng": 126.9}
        ]);
        let report = validate_snapshot(&raw);
        assert!(report.is_array);
        assert_eq!(report.total, 4);
        assert_eq!(report.valid, 2);
        assert_eq!(report.dropped, vec![1, 2]);
    }

    #[test]
    fn validate_flags_non_array_payload() {
        let report = validate_snapshot(&json!({"stores": []}));
        assert!(!report.is_array);
        assert_eq!(report.total, 0);
    }

    #[test]
    fn validate_file_errors_on_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stores.json");
        std::fs::write(&path, "[{").unwrap();
        assert!(run_stores_validate(&path).is_err());

        std::fs::write(&path, "[]").unwrap();
        assert!(run_stores_validate(&path).is_ok());
    }

    #[test]
    fn row_shows_emoji_status_and_price() {
        let row = format_row(&mettle());
        assert!(row.contains("🍪 카페 메틀"));
        assert!(row.contains("[판매중]"));
        assert!(row.contains("5,500원"));
        assert!(row.ends_with("마포구"));
    }

    #[test]
    fn detail_includes_links() {
        let detail = format_detail(&mettle());
        assert!(detail.starts_with("#1 카페 메틀"));
        assert!(detail.contains("rating:     4.8"));
        assert!(detail.contains("map:        https://map.naver.com/search/"));
        assert!(detail.contains("instagram:  https://instagram.com/cafe_mettle"));
    }

    #[tokio::test]
    async fn missing_file_session_falls_back_with_warning() {
        let loader = StoreLoader::new(
            SnapshotSource::File(PathBuf::from("/nonexistent/stores.json")),
            popmap_source::bundled_fallback(),
        );
        let mut session = load_session(&loader, ViewConfig::default()).await;
        assert!(session.warning().is_some());
        assert_eq!(session.stores().len(), 2);
        assert_eq!(session.select_store(2).map(|s| s.name.as_str()), Some("연남 쿠키스팟"));
    }
}
