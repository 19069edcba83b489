//! Per-user wardrobe items.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use best_dressed_core::types::{DbId, Timestamp};

/// A row from the `wardrobe_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WardrobeItem {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_url: String,
    pub catalog_item_id: Option<DbId>,
    pub color: String,
    pub brand: String,
    pub season: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for a manually entered wardrobe item, also used for edits.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateWardrobeItem {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub season: String,
}

/// Item count for one category.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Result of saving a catalog item into a wardrobe.
#[derive(Debug, Clone)]
pub enum SaveOutcome {
    Created(WardrobeItem),
    /// The user already owns a copy of this catalog item.
    AlreadyExists,
}
