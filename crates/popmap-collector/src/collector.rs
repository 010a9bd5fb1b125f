//! Sequential collection run over districts, categories and keywords.

use std::time::Duration;

use popmap_core::CollectTargets;
use serde::Serialize;

use crate::catalog::{Candidate, Catalog, Offer};
use crate::client::NaverLocalClient;

/// Pause after a failed search page before moving on.
const ERROR_PAUSE: Duration = Duration::from_millis(500);

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectSummary {
    pub requests: usize,
    pub failed_requests: usize,
    pub new_stores: usize,
    pub tagged_stores: usize,
    pub total_stores: usize,
    pub hit_hard_cap: bool,
}

pub struct Collector<'a> {
    client: &'a NaverLocalClient,
    targets: &'a CollectTargets,
    delay: Duration,
}

impl<'a> Collector<'a> {
    #[must_use]
    pub fn new(client: &'a NaverLocalClient, targets: &'a CollectTargets, delay: Duration) -> Self {
        Self {
            client,
            targets,
            delay,
        }
    }

    /// Searches `서울 <district> <keyword>` pages in order and merges results
    /// into `catalog` until the daily target or the hard cap is reached.
    ///
    /// Failed pages are logged and skipped; the run itself never fails.
    pub async fn run(&self, catalog: &mut Catalog) -> CollectSummary {
        let targets = self.targets;
        let mut summary = CollectSummary::default();

        'districts: for district in &targets.districts {
            for target in &targets.categories {
                if catalog.category_count(target.category) >= target.limit {
                    tracing::debug!(category = %target.category, "category full; skipping");
                    continue;
                }

                for keyword in &target.keywords {
                    let query = format!("서울 {district} {keyword}");

                    for start in targets.search.offsets() {
                        if summary.new_stores >= targets.daily_target {
                            break 'districts;
                        }
                        if catalog.len() >= targets.total_hard_cap {
                            tracing::info!(
                                total = catalog.len(),
                                cap = targets.total_hard_cap,
                                "reached total hard cap; stopping"
                            );
                            summary.hit_hard_cap = true;
                            break 'districts;
                        }

                        summary.requests += 1;
                        let items = match self
                            .client
                            .search_local(&query, start, targets.search.display)
                            .await
                        {
                            Ok(items) => items,
                            Err(e) => {
                                summary.failed_requests += 1;
                                tracing::warn!(%query, start, error = %e, "local search failed");
                                tokio::time::sleep(ERROR_PAUSE).await;
                                continue;
                            }
                        };
                        tracing::debug!(%query, start, items = items.len(), "local search page");

                        for item in &items {
                            if summary.new_stores >= targets.daily_target {
                                break;
                            }
                            let Some(candidate) = Candidate::from_item(item) else {
                                continue;
                            };
                            let name = candidate.name.clone();
                            match catalog.offer(candidate, target.category, target.limit) {
                                Offer::Added(id) => {
                                    summary.new_stores += 1;
                                    tracing::info!(
                                        id,
                                        %name,
                                        category = %target.category,
                                        added = summary.new_stores,
                                        target = targets.daily_target,
                                        "new store"
                                    );
                                }
                                Offer::Tagged(_) => summary.tagged_stores += 1,
                                Offer::Unchanged => {}
                            }
                        }

                        if !self.delay.is_zero() {
                            tokio::time::sleep(self.delay).await;
                        }
                    }
                }
            }
        }

        summary.total_stores = catalog.len();
        summary
    }
}
