//! Repository for the `wardrobe_items` table.

use sqlx::PgPool;
use best_dressed_core::catalog::VALID_TAGS;
use best_dressed_core::search::contains_pattern;
use best_dressed_core::types::DbId;
use best_dressed_core::wardrobe::{WardrobeFilter, WardrobeSort};

use crate::models::catalog_item::CatalogItem;
use crate::models::wardrobe_item::{CategoryCount, CreateWardrobeItem, SaveOutcome, WardrobeItem};

/// Column list for `wardrobe_items` queries.
const COLUMNS: &str = "\
    id, user_id, title, description, category, image_url, catalog_item_id, \
    color, brand, season, created_at, updated_at";

pub struct WardrobeItemRepo;

impl WardrobeItemRepo {
    /// Insert a manually entered item (no catalog link).
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateWardrobeItem,
    ) -> Result<WardrobeItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO wardrobe_items \
                (user_id, title, description, category, image_url, color, brand, season) \
             VALUES ($1, $2, $3, COALESCE($4, 'other'), $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WardrobeItem>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.image_url)
            .bind(&input.color)
            .bind(&input.brand)
            .bind(&input.season)
            .fetch_one(pool)
            .await
    }

    /// Copy a catalog item into the user's wardrobe exactly once.
    ///
    /// A second save (including a concurrent one) hits the
    /// `(user_id, catalog_item_id)` constraint and reports
    /// [`SaveOutcome::AlreadyExists`] instead of failing.
    pub async fn save_from_catalog(
        pool: &PgPool,
        user_id: DbId,
        item: &CatalogItem,
    ) -> Result<SaveOutcome, sqlx::Error> {
        let query = format!(
            "INSERT INTO wardrobe_items \
                (user_id, title, description, category, image_url, catalog_item_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (user_id, catalog_item_id) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, WardrobeItem>(&query)
            .bind(user_id)
            .bind(&item.title)
            .bind(&item.description)
            .bind(&item.tag)
            .bind(&item.image_url)
            .bind(item.id)
            .fetch_optional(pool)
            .await?;

        Ok(match row {
            Some(created) => SaveOutcome::Created(created),
            None => SaveOutcome::AlreadyExists,
        })
    }

    /// Find an item owned by `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<WardrobeItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wardrobe_items WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, WardrobeItem>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether the user already saved this catalog item.
    pub async fn has_catalog_item(
        pool: &PgPool,
        user_id: DbId,
        catalog_item_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (\
                SELECT 1 FROM wardrobe_items WHERE user_id = $1 AND catalog_item_id = $2\
             )",
        )
        .bind(user_id)
        .bind(catalog_item_id)
        .fetch_one(pool)
        .await
    }

    /// The subset of `ids` owned by `user_id`.
    pub async fn owned_ids(
        pool: &PgPool,
        user_id: DbId,
        ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM wardrobe_items WHERE user_id = $1 AND id = ANY($2)",
        )
        .bind(user_id)
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    /// Filtered, sorted wardrobe listing for one user.
    pub async fn list(
        pool: &PgPool,
        user_id: DbId,
        filter: &WardrobeFilter,
    ) -> Result<Vec<WardrobeItem>, sqlx::Error> {
        let mut conditions = vec!["user_id = $1".to_string()];
        let mut bind_idx = 2u32;

        if filter.category.is_some() {
            conditions.push(format!("category = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.search.is_some() {
            conditions.push(format!(
                "(title ILIKE ${bind_idx} OR description ILIKE ${bind_idx} \
                  OR brand ILIKE ${bind_idx} OR color ILIKE ${bind_idx})"
            ));
        }

        let query = format!(
            "SELECT {COLUMNS} FROM wardrobe_items WHERE {} ORDER BY {}",
            conditions.join(" AND "),
            order_by(filter.sort),
        );

        let mut q = sqlx::query_as::<_, WardrobeItem>(&query).bind(user_id);
        if let Some(ref category) = filter.category {
            q = q.bind(category);
        }
        if let Some(ref term) = filter.search {
            q = q.bind(contains_pattern(term));
        }
        q.fetch_all(pool).await
    }

    /// Item count per category, every category present (zero-filled), in
    /// category order.
    pub async fn category_counts(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<CategoryCount>, sqlx::Error> {
        let rows = sqlx::query_as::<_, CategoryCount>(
            "SELECT category, COUNT(*) AS count FROM wardrobe_items \
             WHERE user_id = $1 GROUP BY category",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(VALID_TAGS
            .iter()
            .map(|tag| CategoryCount {
                category: tag.to_string(),
                count: rows
                    .iter()
                    .find(|r| r.category == *tag)
                    .map_or(0, |r| r.count),
            })
            .collect())
    }

    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM wardrobe_items WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Replace an owned item's editable fields. Returns `None` if the item
    /// does not exist or belongs to someone else.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &CreateWardrobeItem,
    ) -> Result<Option<WardrobeItem>, sqlx::Error> {
        let query = format!(
            "UPDATE wardrobe_items SET \
                title = $3, description = $4, category = COALESCE($5, 'other'), \
                image_url = $6, color = $7, brand = $8, season = $9, updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WardrobeItem>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.image_url)
            .bind(&input.color)
            .bind(&input.brand)
            .bind(&input.season)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if an owned item was deleted.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM wardrobe_items WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn order_by(sort: WardrobeSort) -> &'static str {
    match sort {
        WardrobeSort::CreatedDesc => "created_at DESC, id DESC",
        WardrobeSort::CreatedAsc => "created_at ASC, id ASC",
        WardrobeSort::TitleAsc => "title ASC, id ASC",
        WardrobeSort::TitleDesc => "title DESC, id DESC",
        WardrobeSort::BrandAsc => "brand ASC, id ASC",
        WardrobeSort::BrandDesc => "brand DESC, id DESC",
    }
}
