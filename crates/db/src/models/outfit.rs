//! Outfits and their listing projections.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use best_dressed_core::types::{DbId, Timestamp};

use super::wardrobe_item::WardrobeItem;

/// A row from the `outfits` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Outfit {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub description: String,
    pub occasion: String,
    pub season: String,
    pub is_favorite: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Outfit row plus its linked-item count.
#[derive(Debug, Clone, FromRow)]
pub struct OutfitSummary {
    #[sqlx(flatten)]
    pub outfit: Outfit,
    pub item_count: i64,
}

/// Outfit with its wardrobe items loaded.
#[derive(Debug, Clone, Serialize)]
pub struct OutfitWithItems {
    #[serde(flatten)]
    pub outfit: Outfit,
    pub item_count: i64,
    pub items: Vec<WardrobeItem>,
}

/// Create/edit form. An edit replaces every field and the item set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateOutfit {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub occasion: String,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub items: Vec<DbId>,
}

/// Result of creating or renaming an outfit.
#[derive(Debug, Clone)]
pub enum OutfitWrite {
    Saved(OutfitWithItems),
    /// The user already has an outfit with this name.
    NameTaken,
}

/// Smart-collection name to outfit count.
pub type CollectionCounts = BTreeMap<String, i64>;

/// Occurrences of one season or occasion value.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct StatCount {
    pub key: String,
    pub count: i64,
}
