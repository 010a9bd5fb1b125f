//! `collect` command: grows the snapshot from local search results.
//!
//! Failed search pages are logged and skipped by the collector; only
//! configuration, credential and snapshot-write problems abort the run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use popmap_collector::{read_snapshot, write_snapshot, Catalog, Collector, NaverLocalClient};
use popmap_core::{load_collect_targets, AppConfig, CollectTargets};

/// Runs one collection pass and rewrites the snapshot at `out`.
///
/// When `dry_run` is `true` the plan is printed and nothing is fetched or
/// written; credentials are not required.
///
/// # Errors
///
/// Returns an error if the targets file is invalid, the search credentials
/// are missing, the client cannot be built, or the existing snapshot cannot
/// be read or the new one written.
pub(crate) async fn run_collect(
    config: &AppConfig,
    out: Option<PathBuf>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let targets = load_collect_targets(&config.collect_config_path)?;
    let out = out.unwrap_or_else(|| config.snapshot_path.clone());
    let mut catalog = seed_catalog(&out)?;

    if dry_run {
        println!("dry-run: would merge into {}", out.display());
        for line in describe_plan(&targets, &catalog) {
            println!("  {line}");
        }
        return Ok(());
    }

    let credentials = config.naver_credentials()?;
    let client = NaverLocalClient::new(
        credentials,
        config.request_timeout_secs,
        &config.user_agent,
        config.collect_max_retries,
        config.collect_backoff_base_ms,
    )
    .map_err(|e| anyhow::anyhow!("failed to build local search client: {e}"))?;

    tracing::info!(
        existing = catalog.len(),
        daily_target = targets.daily_target,
        out = %out.display(),
        "starting collection run"
    );
    let collector = Collector::new(
        &client,
        &targets,
        Duration::from_millis(config.collect_delay_ms),
    );
    let summary = collector.run(&mut catalog).await;

    write_snapshot(&out, &catalog.into_sorted())?;
    tracing::info!(
        new_stores = summary.new_stores,
        total = summary.total_stores,
        "collection run complete"
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Seeds the catalog from the snapshot at `out`. Only a missing file starts
/// empty.
fn seed_catalog(out: &Path) -> anyhow::Result<Catalog> {
    let existing = read_snapshot(out)?;
    Ok(Catalog::from_existing(existing))
}

fn describe_plan(targets: &CollectTargets, catalog: &Catalog) -> Vec<String> {
    let pages_per_keyword = targets.search.offsets().count();
    let mut lines = vec![
        format!(
            "{} existing stores (hard cap {})",
            catalog.len(),
            targets.total_hard_cap
        ),
        format!("up to {} new stores this run", targets.daily_target),
        format!(
            "{} districts: {}",
            targets.districts.len(),
            targets.districts.join(", ")
        ),
    ];

    for target in &targets.categories {
        let count = catalog.category_count(target.category);
        let state = if count >= target.limit { "full" } else { "open" };
        lines.push(format!(
            "{}: {count}/{} stores ({state}), keywords [{}], {pages_per_keyword} pages each",
            target.category,
            target.limit,
            target.keywords.join(", ")
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use popmap_core::{CategoryTarget, SearchWindow, StoreCategory};

    use super::*;

    fn targets() -> CollectTargets {
        CollectTargets {
            districts: vec!["마포구".to_string(), "성동구".to_string()],
            categories: vec![
                CategoryTarget {
                    category: StoreCategory::Dubai,
                    keywords: vec!["두바이쫀득쿠키".to_string()],
                    limit: 1,
                },
                CategoryTarget {
                    category: StoreCategory::Goguma,
                    keywords: vec!["군고구마".to_string()],
                    limit: 10,
                },
            ],
            daily_target: 50,
            total_hard_cap: 4000,
            search: SearchWindow {
                display: 5,
                start: 1,
                end: 11,
                step: 5,
            },
        }
    }

    #[test]
    fn corrupt_snapshot_aborts_and_is_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stores.json");
        std::fs::write(&path, "[{\"id\": 1,").unwrap();

        let err = seed_catalog(&path).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[{\"id\": 1,");
    }

    #[test]
    fn missing_snapshot_seeds_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = seed_catalog(&dir.path().join("stores.json")).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn plan_marks_full_categories() {
        let catalog = Catalog::from_existing(popmap_source::bundled_fallback());
        let lines = describe_plan(&targets(), &catalog);

        assert_eq!(lines[0], "2 existing stores (hard cap 4000)");
        assert_eq!(lines[2], "2 districts: 마포구, 성동구");
        assert!(lines[3].starts_with("dubai: 2/1 stores (full)"));
        assert!(lines[4].starts_with("goguma: 0/10 stores (open)"));
        assert!(lines[4].ends_with("3 pages each"));
    }
}
