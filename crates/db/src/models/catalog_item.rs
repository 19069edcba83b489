//! Shared catalog items.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use best_dressed_core::types::{DbId, Timestamp};

/// A row from the `catalog_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CatalogItem {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub short_description: String,
    pub image_url: String,
    pub tag: String,
    /// Marketplace listing id, when imported.
    pub item_id: Option<String>,
    pub item_url: Option<String>,
    pub seller_id: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for inserting a catalog item.
///
/// `short_description` is derived from `description` on insert.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCatalogItem {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub tag: Option<String>,
    pub item_id: Option<String>,
    pub item_url: Option<String>,
    pub seller_id: Option<String>,
}
