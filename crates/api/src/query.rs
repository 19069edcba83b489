//! Shared query parameter types for API handlers.
//!
//! Every field is a raw optional string; validation and defaults live in
//! the `best_dressed_core` filter types these are converted into.

use best_dressed_core::outfit::OutfitFilter;
use best_dressed_core::wardrobe::WardrobeFilter;
use serde::Deserialize;

/// `?search=` on listing pages.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

/// `?next=` on the login page.
#[derive(Debug, Default, Deserialize)]
pub struct NextParams {
    pub next: Option<String>,
}

/// `GET /wardrobe/` query string.
#[derive(Debug, Default, Deserialize)]
pub struct WardrobeParams {
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl WardrobeParams {
    pub fn to_filter(&self) -> WardrobeFilter {
        WardrobeFilter::from_params(
            self.category.as_deref(),
            self.search.as_deref(),
            self.sort.as_deref(),
        )
    }
}

/// `GET /outfits/` query string.
#[derive(Debug, Default, Deserialize)]
pub struct OutfitParams {
    pub collection: Option<String>,
    pub occasion: Option<String>,
    pub season: Option<String>,
    pub favorites: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl OutfitParams {
    pub fn to_filter(&self) -> OutfitFilter {
        OutfitFilter::from_params(
            self.collection.as_deref(),
            self.occasion.as_deref(),
            self.season.as_deref(),
            self.favorites.as_deref(),
            self.search.as_deref(),
            self.sort.as_deref(),
        )
    }
}
