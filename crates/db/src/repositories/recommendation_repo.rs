//! Repository for `saved_recommendations` and `recommendation_items`.

use std::collections::HashMap;

use sqlx::PgPool;
use best_dressed_core::types::DbId;

use crate::models::catalog_item::CatalogItem;
use crate::models::recommendation::{RecommendationWithItems, SavedRecommendation};

const COLUMNS: &str = "id, user_id, prompt, ai_response, created_at";

/// Catalog columns qualified with the `c` alias.
const ITEM_COLUMNS: &str = "\
    c.id, c.title, c.description, c.short_description, c.image_url, c.tag, \
    c.item_id, c.item_url, c.seller_id, c.created_at";

#[derive(sqlx::FromRow)]
struct LinkedItem {
    recommendation_id: DbId,
    #[sqlx(flatten)]
    item: CatalogItem,
}

pub struct RecommendationRepo;

impl RecommendationRepo {
    /// Persist a recommendation and its item links atomically.
    ///
    /// `item_ids` must reference existing catalog items; their order is
    /// kept as the display order.
    pub async fn create_with_items(
        pool: &PgPool,
        user_id: DbId,
        prompt: &str,
        ai_response: &str,
        item_ids: &[DbId],
    ) -> Result<SavedRecommendation, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO saved_recommendations (user_id, prompt, ai_response) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let saved = sqlx::query_as::<_, SavedRecommendation>(&query)
            .bind(user_id)
            .bind(prompt)
            .bind(ai_response)
            .fetch_one(&mut *tx)
            .await?;

        if !item_ids.is_empty() {
            sqlx::query(
                "INSERT INTO recommendation_items (recommendation_id, catalog_item_id, position) \
                 SELECT $1, item.id, item.position::INTEGER \
                 FROM UNNEST($2::BIGINT[]) WITH ORDINALITY AS item(id, position) \
                 ON CONFLICT (recommendation_id, catalog_item_id) DO NOTHING",
            )
            .bind(saved.id)
            .bind(item_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(saved)
    }

    /// The user's saved recommendations, newest first, each with its items.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<RecommendationWithItems>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM saved_recommendations \
             WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        let saved = sqlx::query_as::<_, SavedRecommendation>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = saved.iter().map(|r| r.id).collect();
        let mut items = load_items(pool, &ids).await?;

        Ok(saved
            .into_iter()
            .map(|recommendation| RecommendationWithItems {
                items: items.remove(&recommendation.id).unwrap_or_default(),
                recommendation,
            })
            .collect())
    }

    /// Items linked to one recommendation, in advisor order.
    pub async fn items_for(
        pool: &PgPool,
        recommendation_id: DbId,
    ) -> Result<Vec<CatalogItem>, sqlx::Error> {
        let mut items = load_items(pool, &[recommendation_id]).await?;
        Ok(items.remove(&recommendation_id).unwrap_or_default())
    }
}

async fn load_items(
    pool: &PgPool,
    recommendation_ids: &[DbId],
) -> Result<HashMap<DbId, Vec<CatalogItem>>, sqlx::Error> {
    if recommendation_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let query = format!(
        "SELECT ri.recommendation_id, {ITEM_COLUMNS} \
         FROM recommendation_items ri \
         JOIN catalog_items c ON c.id = ri.catalog_item_id \
         WHERE ri.recommendation_id = ANY($1) \
         ORDER BY ri.position"
    );
    let rows = sqlx::query_as::<_, LinkedItem>(&query)
        .bind(recommendation_ids)
        .fetch_all(pool)
        .await?;

    let mut grouped: HashMap<DbId, Vec<CatalogItem>> = HashMap::new();
    for row in rows {
        grouped.entry(row.recommendation_id).or_default().push(row.item);
    }
    Ok(grouped)
}
