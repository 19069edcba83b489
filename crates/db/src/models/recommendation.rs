use serde::Serialize;
use sqlx::FromRow;
use best_dressed_core::types::{DbId, Timestamp};

use super::catalog_item::CatalogItem;

/// A row from the `saved_recommendations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SavedRecommendation {
    pub id: DbId,
    pub user_id: DbId,
    pub prompt: String,
    pub ai_response: String,
    pub created_at: Timestamp,
}

/// Saved recommendation with its catalog items in advisor order.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationWithItems {
    #[serde(flatten)]
    pub recommendation: SavedRecommendation,
    pub items: Vec<CatalogItem>,
}
