use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use popmap_core::{
    category_chips, filter_stores, format_price, instagram_url, map_search_url, status_label,
    Category, CategoryChip, StockStatus, StoreFilter, StoreRecord, ViewConfig,
};
use popmap_core::view::{category_emoji, Badge, Palette, DEFAULT_CENTER, DEFAULT_ZOOM, STORE_ZOOM};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;
use crate::state::AppState;

use super::{normalize_limit, ApiError, ApiResponse, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct StoresQuery {
    pub category: Option<String>,
    pub q: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct StoreList {
    /// Matches before `limit` was applied.
    total: usize,
    items: Vec<StoreRecord>,
}

#[derive(Debug, Serialize)]
pub(super) struct MarkerList {
    /// Matches before the marker cap was applied.
    total: usize,
    markers: Vec<Marker>,
}

#[derive(Debug, Serialize)]
pub(super) struct Marker {
    id: i64,
    name: String,
    lat: f64,
    lng: f64,
    status: StockStatus,
    emoji: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub(super) struct StoreDetail {
    store: StoreRecord,
    status_label: &'static str,
    badge: Badge,
    price_display: String,
    emoji: Option<&'static str>,
    map_url: String,
    instagram_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct CategoryItem {
    #[serde(flatten)]
    chip: CategoryChip,
    count: usize,
}

#[derive(Debug, Serialize)]
pub(super) struct ViewConfigData {
    #[serde(flatten)]
    config: ViewConfig,
    palette: Palette,
    default_center: (f64, f64),
    default_zoom: u8,
    store_zoom: u8,
}

fn parse_category(req_id: &RequestId, raw: Option<&str>) -> Result<Category, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Category::All),
        Some(s) => s
            .parse()
            .map_err(|e: popmap_core::stores::UnknownCategory| {
                ApiError::new(req_id.0.clone(), "bad_request", e.to_string())
            }),
    }
}

pub(super) async fn list_stores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<StoresQuery>,
) -> Result<Json<ApiResponse<StoreList>>, ApiError> {
    let category = parse_category(&req_id, query.category.as_deref())?;
    let filter = StoreFilter::new(category, query.q);
    let limit = normalize_limit(query.limit).unwrap_or(usize::MAX);

    let catalog = state.catalog.read().await;
    let visible = filter_stores(&catalog.stores, &filter);
    let items = visible.iter().take(limit).map(|s| (*s).clone()).collect();

    Ok(Json(ApiResponse {
        data: StoreList {
            total: visible.len(),
            items,
        },
        meta: ResponseMeta::new(req_id.0).with_origin(catalog.origin, catalog.warning.clone()),
    }))
}

/// Map marker points for the filtered set, truncated to the marker cap.
pub(super) async fn list_markers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<StoresQuery>,
) -> Result<Json<ApiResponse<MarkerList>>, ApiError> {
    let category = parse_category(&req_id, query.category.as_deref())?;
    let filter = StoreFilter::new(category, query.q);

    let catalog = state.catalog.read().await;
    let visible = filter_stores(&catalog.stores, &filter);
    let markers = state
        .view
        .cap_markers(&visible)
        .iter()
        .map(|s| Marker {
            id: s.id,
            name: s.name.clone(),
            lat: s.lat,
            lng: s.lng,
            status: s.status,
            emoji: s.primary_category().map(category_emoji),
        })
        .collect();

    Ok(Json(ApiResponse {
        data: MarkerList {
            total: visible.len(),
            markers,
        },
        meta: ResponseMeta::new(req_id.0).with_origin(catalog.origin, catalog.warning.clone()),
    }))
}

pub(super) async fn get_store(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<StoreDetail>>, ApiError> {
    let catalog = state.catalog.read().await;
    let Some(store) = catalog.stores.iter().find(|s| s.id == id) else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("store {id} not found"),
        ));
    };

    let data = StoreDetail {
        status_label: status_label(store.status),
        badge: state.view.badge(store.status).clone(),
        price_display: format_price(store.price),
        emoji: store.primary_category().map(category_emoji),
        map_url: map_search_url(store),
        instagram_url: instagram_url(store),
        store: store.clone(),
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0).with_origin(catalog.origin, catalog.warning.clone()),
    }))
}

pub(super) async fn list_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<CategoryItem>>> {
    let catalog = state.catalog.read().await;
    let data = category_chips()
        .into_iter()
        .map(|chip| {
            let filter = StoreFilter::new(chip.id, None);
            let count = catalog.stores.iter().filter(|s| filter.matches(s)).count();
            CategoryItem { chip, count }
        })
        .collect();

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn view_config(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<ViewConfigData>> {
    let config = ViewConfig::clone(&state.view);
    Json(ApiResponse {
        data: ViewConfigData {
            palette: config.theme.palette(),
            config,
            default_center: DEFAULT_CENTER,
            default_zoom: DEFAULT_ZOOM,
            store_zoom: STORE_ZOOM,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

/// The snapshot file as published, byte for byte.
pub(super) async fn snapshot_file(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Response, ApiError> {
    let path = state.snapshot_path.as_path();
    match tokio::fs::read(path).await {
        Ok(body) => Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ApiError::new(
            req_id.0,
            "not_found",
            "no snapshot has been published",
        )),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "snapshot file unreadable");
            Err(ApiError::new(
                req_id.0,
                "internal_error",
                "snapshot file unreadable",
            ))
        }
    }
}
