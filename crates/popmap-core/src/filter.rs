//! Category and free-text filtering over normalized store records.

use serde::{Deserialize, Serialize};

use crate::stores::{Category, StoreRecord};

/// Active filter inputs. Both gates must pass for a record to be visible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFilter {
    pub category: Category,
    /// Free-text query; blank or whitespace-only matches everything.
    pub query: Option<String>,
}

impl StoreFilter {
    #[must_use]
    pub fn new(category: Category, query: Option<String>) -> Self {
        Self { category, query }
    }

    /// Returns `true` when `store` passes both the category and text gates.
    #[must_use]
    pub fn matches(&self, store: &StoreRecord) -> bool {
        self.category_matches(store) && self.query_matches(store)
    }

    fn category_matches(&self, store: &StoreRecord) -> bool {
        match self.category {
            Category::All => true,
            Category::Only(tag) => store.has_category(tag),
        }
    }

    fn query_matches(&self, store: &StoreRecord) -> bool {
        let Some(needle) = self.folded_query() else {
            return true;
        };
        store.search_text().to_lowercase().contains(&needle)
    }

    fn folded_query(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }
}

/// Returns the visible subset of `stores`, in their original order.
#[must_use]
pub fn filter_stores<'a>(stores: &'a [StoreRecord], filter: &StoreFilter) -> Vec<&'a StoreRecord> {
    stores.iter().filter(|s| filter.matches(s)).collect()
}
