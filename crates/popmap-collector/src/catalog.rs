//! Accumulating store catalog that new search results merge into.

use std::collections::HashMap;

use popmap_core::{StockStatus, StoreCategory, StoreRecord};

use crate::parse::{clean_html, district_from, is_seoul_address, normalize_key, try_parse_latlng};
use crate::types::LocalItem;

/// Defaults for stores discovered by the collector.
const NEW_STORE_PRICE: f64 = 5500.0;
const NEW_STORE_RATING: f64 = 4.6;

/// A search result that passed the Seoul address and coordinate checks.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

impl Candidate {
    /// Returns `None` for results outside Seoul or without usable coordinates.
    #[must_use]
    pub fn from_item(item: &LocalItem) -> Option<Self> {
        let address = item.best_address();
        if !is_seoul_address(address) {
            return None;
        }
        let (lat, lng) = try_parse_latlng(item.mapx.as_ref(), item.mapy.as_ref())?;
        Some(Self {
            name: clean_html(&item.title),
            address: address.to_string(),
            lat,
            lng,
        })
    }

    fn key(&self) -> String {
        normalize_key(&self.name, &self.address, self.lat, self.lng)
    }
}

/// What [`Catalog::offer`] did with a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// New store appended with this id.
    Added(i64),
    /// Existing store gained the category.
    Tagged(i64),
    /// Existing store already had the category, or the category is full.
    Unchanged,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    stores: Vec<StoreRecord>,
    by_key: HashMap<String, usize>,
    category_counts: HashMap<StoreCategory, usize>,
    next_id: i64,
}

impl Catalog {
    /// Seeds the catalog with an existing snapshot.
    ///
    /// Each store's tags are de-duplicated and its `category` reset to the
    /// first tag. Later stores with the same dedup key replace earlier ones.
    #[must_use]
    pub fn from_existing(existing: Vec<StoreRecord>) -> Self {
        let mut catalog = Self {
            next_id: 1,
            ..Self::default()
        };

        for mut store in existing {
            ensure_categories(&mut store);
            catalog.next_id = catalog.next_id.max(store.id.saturating_add(1));
            for tag in &store.categories {
                *catalog.category_counts.entry(*tag).or_default() += 1;
            }

            let key = store_key(&store);
            match catalog.by_key.get(&key) {
                Some(&index) => catalog.stores[index] = store,
                None => {
                    catalog.by_key.insert(key, catalog.stores.len());
                    catalog.stores.push(store);
                }
            }
        }

        catalog
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    #[must_use]
    pub fn category_count(&self, category: StoreCategory) -> usize {
        self.category_counts.get(&category).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn next_id(&self) -> i64 {
        self.next_id
    }

    /// Merges `candidate` under `category`, respecting `limit` for that
    /// category.
    pub fn offer(&mut self, candidate: Candidate, category: StoreCategory, limit: usize) -> Offer {
        let has_room = self.category_count(category) < limit;
        let key = candidate.key();

        if let Some(&index) = self.by_key.get(&key) {
            let store = &mut self.stores[index];
            if store.has_category(category) || !has_room {
                return Offer::Unchanged;
            }
            store.categories.push(category);
            store.category = store.primary_category();
            *self.category_counts.entry(category).or_default() += 1;
            tracing::debug!(id = store.id, %category, name = %store.name, "category added");
            return Offer::Tagged(store.id);
        }

        if !has_room {
            return Offer::Unchanged;
        }

        let id = self.next_id;
        let Some(next_id) = id.checked_add(1) else {
            tracing::warn!(id, name = %candidate.name, "store id space exhausted; skipping");
            return Offer::Unchanged;
        };
        self.next_id = next_id;
        let district = district_from(&candidate.address);
        self.stores.push(StoreRecord {
            id,
            name: candidate.name,
            address: Some(candidate.address),
            district,
            lat: candidate.lat,
            lng: candidate.lng,
            status: StockStatus::Available,
            price: Some(NEW_STORE_PRICE),
            categories: vec![category],
            category: Some(category),
            rating: Some(NEW_STORE_RATING),
            distance: None,
            instagram_handle: None,
            extra: serde_json::Map::new(),
        });
        self.by_key.insert(key, self.stores.len() - 1);
        *self.category_counts.entry(category).or_default() += 1;
        Offer::Added(id)
    }

    /// All stores ordered by id.
    #[must_use]
    pub fn into_sorted(mut self) -> Vec<StoreRecord> {
        self.stores.sort_by_key(|s| s.id);
        self.stores
    }
}

fn ensure_categories(store: &mut StoreRecord) {
    let mut seen = Vec::with_capacity(store.categories.len());
    store.categories.retain(|tag| {
        if seen.contains(tag) {
            false
        } else {
            seen.push(*tag);
            true
        }
    });
    store.category = store.primary_category();
}

fn store_key(store: &StoreRecord) -> String {
    normalize_key(
        &store.name,
        store.address.as_deref().unwrap_or_default(),
        store.lat,
        store.lng,
    )
}
