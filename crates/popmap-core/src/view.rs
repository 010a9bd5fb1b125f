//! Presentation settings and helpers shared by every front end.
//!
//! The map, list, chooser and detail views are rendered elsewhere; this
//! module owns the pieces they all agree on: one [`ViewConfig`] instead of a
//! copy of each component per look, labels and badges, price display, and
//! the [`MapController`] contract the map widget implements.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::stores::{Category, StockStatus, StoreCategory};

/// Seoul City Hall; the initial map center.
pub const DEFAULT_CENTER: (f64, f64) = (37.5665, 126.978);
pub const DEFAULT_ZOOM: u8 = 12;
/// Zoom level used when recentering on a single store.
pub const STORE_ZOOM: u8 = 16;

pub const PRICE_PLACEHOLDER: &str = "가격 정보 없음";

// ---------------------------------------------------------------------------
// Theme and density
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Cream,
    Poster,
    Pistachio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub background: &'static str,
    pub accent: &'static str,
    pub outline: &'static str,
}

impl Theme {
    #[must_use]
    pub fn palette(self) -> Palette {
        match self {
            Theme::Cream => Palette {
                background: "#FBF5EA",
                accent: "#6B4423",
                outline: "#AC998C",
            },
            Theme::Poster => Palette {
                background: "#F7C600",
                accent: "#111111",
                outline: "#111111",
            },
            Theme::Pistachio => Palette {
                background: "#FFFFFF",
                accent: "#93C572",
                outline: "#6B4423",
            },
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cream" => Ok(Theme::Cream),
            "poster" => Ok(Theme::Poster),
            "pistachio" => Ok(Theme::Pistachio),
            other => Err(format!(
                "unknown theme '{other}'; expected cream, poster, or pistachio"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardDensity {
    Compact,
    #[default]
    Comfortable,
}

impl FromStr for CardDensity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compact" => Ok(CardDensity::Compact),
            "comfortable" => Ok(CardDensity::Comfortable),
            other => Err(format!(
                "unknown card density '{other}'; expected compact or comfortable"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Badges and labels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub label: String,
    pub note: String,
}

impl Badge {
    fn new(label: &str, note: &str) -> Self {
        Self {
            label: label.to_string(),
            note: note.to_string(),
        }
    }
}

/// List-card badge text per stock status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeLabels {
    pub available: Badge,
    pub soldout: Badge,
    pub check: Badge,
}

impl Default for BadgeLabels {
    fn default() -> Self {
        Self {
            available: Badge::new("IN STOCK", "AVAILABLE"),
            soldout: Badge::new("SOLD OUT", "RESTOCKING"),
            check: Badge::new("LIMITED", "HURRY!"),
        }
    }
}

/// Korean status label shown in popups and the detail view.
#[must_use]
pub fn status_label(status: StockStatus) -> &'static str {
    match status {
        StockStatus::Available => "판매중",
        StockStatus::Soldout => "품절",
        StockStatus::Check => "확인필요",
    }
}

/// One button of the category chooser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryChip {
    pub id: Category,
    pub ko: &'static str,
    pub en: &'static str,
    pub emoji: &'static str,
}

/// Chooser entries in display order, `all` first.
#[must_use]
pub fn category_chips() -> Vec<CategoryChip> {
    std::iter::once(CategoryChip {
        id: Category::All,
        ko: "전체",
        en: "ALL",
        emoji: "🌟",
    })
    .chain(StoreCategory::ALL.into_iter().map(|tag| CategoryChip {
        id: Category::Only(tag),
        ko: korean_name(tag),
        en: english_name(tag),
        emoji: category_emoji(tag),
    }))
    .collect()
}

fn korean_name(tag: StoreCategory) -> &'static str {
    match tag {
        StoreCategory::Dubai => "두바이 쿠키",
        StoreCategory::Bungeoppang => "붕어빵",
        StoreCategory::Goguma => "군고구마",
        StoreCategory::Cake => "케이크",
    }
}

fn english_name(tag: StoreCategory) -> &'static str {
    match tag {
        StoreCategory::Dubai => "DUBAI",
        StoreCategory::Bungeoppang => "BUNGEOPPANG",
        StoreCategory::Goguma => "GOGUMA",
        StoreCategory::Cake => "CAKE",
    }
}

/// Marker and card emoji for a tag.
#[must_use]
pub fn category_emoji(tag: StoreCategory) -> &'static str {
    match tag {
        StoreCategory::Dubai => "🍪",
        StoreCategory::Bungeoppang => "🐟",
        StoreCategory::Goguma => "🍠",
        StoreCategory::Cake => "🎂",
    }
}

/// Renders a KRW price as `5,500원`, or the placeholder when absent.
#[must_use]
pub fn format_price(price: Option<f64>) -> String {
    let Some(price) = price.filter(|p| p.is_finite() && *p >= 0.0) else {
        return PRICE_PLACEHOLDER.to_string();
    };

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let won = price.round() as u64;
    let digits = won.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push('원');
    grouped
}

// ---------------------------------------------------------------------------
// ViewConfig
// ---------------------------------------------------------------------------

/// Every recognized presentation option in one place.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewConfig {
    pub theme: Theme,
    pub card_density: CardDensity,
    pub badge_labels: BadgeLabels,
    /// Upper bound on rendered markers. Applied after filtering.
    pub marker_cap: Option<usize>,
}

impl ViewConfig {
    #[must_use]
    pub fn badge(&self, status: StockStatus) -> &Badge {
        match status {
            StockStatus::Available => &self.badge_labels.available,
            StockStatus::Soldout => &self.badge_labels.soldout,
            StockStatus::Check => &self.badge_labels.check,
        }
    }

    /// Truncates an already-filtered list to the marker cap.
    #[must_use]
    pub fn cap_markers<'a, T>(&self, visible: &'a [T]) -> &'a [T] {
        match self.marker_cap {
            Some(cap) if cap < visible.len() => &visible[..cap],
            _ => visible,
        }
    }
}

// ---------------------------------------------------------------------------
// Map controller
// ---------------------------------------------------------------------------

/// Callback run once the map widget can accept commands.
pub type ReadyHandler = Box<dyn FnOnce(&mut dyn MapController) + Send>;

/// Commands the surrounding view may issue to the map widget.
pub trait MapController: Send {
    /// Moves the viewport to `(lat, lng)` at `zoom`.
    fn recenter(&mut self, lat: f64, lng: f64, zoom: u8);

    /// Registers `handler` to run when the map is ready, or immediately if
    /// it already is.
    fn on_ready(&mut self, handler: ReadyHandler);
}

/// Headless map state: tracks the viewport and ready handlers. Used by
/// front ends that have no widget of their own and by tests.
pub struct Viewport {
    center: (f64, f64),
    zoom: u8,
    ready: bool,
    pending: Vec<ReadyHandler>,
}

impl Viewport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            ready: false,
            pending: Vec::new(),
        }
    }

    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    #[must_use]
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Flags the map as ready and drains queued handlers in order.
    pub fn mark_ready(&mut self) {
        self.ready = true;
        for handler in std::mem::take(&mut self.pending) {
            handler(self);
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewport")
            .field("center", &self.center)
            .field("zoom", &self.zoom)
            .field("ready", &self.ready)
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl MapController for Viewport {
    fn recenter(&mut self, lat: f64, lng: f64, zoom: u8) {
        self.center = (lat, lng);
        self.zoom = zoom;
    }

    fn on_ready(&mut self, handler: ReadyHandler) {
        if self.ready {
            handler(self);
        } else {
            self.pending.push(handler);
        }
    }
}
