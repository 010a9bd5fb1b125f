//! Outbound links built from a store record.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::stores::StoreRecord;

const NAVER_MAP_SEARCH: &str = "https://map.naver.com/search/";
const INSTAGRAM: &str = "https://instagram.com/";

/// Characters left unescaped by a browser's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Map-search URL for a store, keyed on its address or, without one, its name.
#[must_use]
pub fn map_search_url(store: &StoreRecord) -> String {
    let target = store
        .address
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or(&store.name);
    format!(
        "{NAVER_MAP_SEARCH}{}",
        utf8_percent_encode(target, URI_COMPONENT)
    )
}

/// Instagram profile URL, when the store has a handle.
#[must_use]
pub fn instagram_url(store: &StoreRecord) -> Option<String> {
    store
        .instagram_handle
        .as_deref()
        .map(|h| h.trim().trim_start_matches('@'))
        .filter(|h| !h.is_empty())
        .map(|h| format!("{INSTAGRAM}{h}"))
}
