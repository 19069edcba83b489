//! Repository for the `outfits` and `outfit_items` tables.
//!
//! The listing compiles an [`OutfitFilter`] into a single query; items for
//! every returned outfit are then loaded with one additional query.

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Row, Transaction};
use best_dressed_core::outfit::{copy_name, CollectionCriterion, OutfitFilter, OutfitSort, SmartCollection};
use best_dressed_core::search::contains_pattern;
use best_dressed_core::types::DbId;

use crate::models::outfit::{
    CollectionCounts, CreateOutfit, Outfit, OutfitSummary, OutfitWithItems, OutfitWrite, StatCount,
};
use crate::models::wardrobe_item::WardrobeItem;

/// Column list for `outfits` queries, qualified with the `o` alias.
const COLUMNS: &str = "\
    o.id, o.user_id, o.name, o.description, o.occasion, o.season, \
    o.is_favorite, o.created_at, o.updated_at";

/// Linked-item count subquery for the outfit aliased `o`.
const ITEM_COUNT_SQL: &str = "(SELECT COUNT(*) FROM outfit_items oi WHERE oi.outfit_id = o.id)";

/// Wardrobe item columns qualified with the `w` alias.
const ITEM_COLUMNS: &str = "\
    w.id, w.user_id, w.title, w.description, w.category, w.image_url, \
    w.catalog_item_id, w.color, w.brand, w.season, w.created_at, w.updated_at";

/// Row shape for the eager item load.
#[derive(sqlx::FromRow)]
struct LinkedItem {
    outfit_id: DbId,
    #[sqlx(flatten)]
    item: WardrobeItem,
}

pub struct OutfitRepo;

impl OutfitRepo {
    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Create an outfit and link its items in one transaction.
    ///
    /// Item ids must already be verified as owned by `user_id`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateOutfit,
    ) -> Result<OutfitWrite, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO outfits AS o (user_id, name, description, occasion, season, is_favorite) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (user_id, name) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, Outfit>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.occasion)
            .bind(&input.season)
            .bind(input.is_favorite)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(outfit) = created else {
            return Ok(OutfitWrite::NameTaken);
        };

        link_items(&mut tx, outfit.id, &input.items).await?;
        tx.commit().await?;

        Self::with_items(pool, outfit).await.map(OutfitWrite::Saved)
    }

    /// Replace an owned outfit's fields and item set.
    ///
    /// Returns `None` when the outfit does not exist or belongs to someone
    /// else.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &CreateOutfit,
    ) -> Result<Option<OutfitWrite>, sqlx::Error> {
        if Self::find_for_user(pool, id, user_id).await?.is_none() {
            return Ok(None);
        }

        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE outfits AS o SET \
                name = $3, description = $4, occasion = $5, season = $6, \
                is_favorite = $7, updated_at = NOW() \
             WHERE o.id = $1 AND o.user_id = $2 \
               AND NOT EXISTS (\
                   SELECT 1 FROM outfits other \
                   WHERE other.user_id = $2 AND other.name = $3 AND other.id <> $1\
               ) \
             RETURNING {COLUMNS}"
        );
        // A concurrent rename can pass the NOT EXISTS check and still hit
        // the unique constraint.
        let updated = match sqlx::query_as::<_, Outfit>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.occasion)
            .bind(&input.season)
            .bind(input.is_favorite)
            .fetch_optional(&mut *tx)
            .await
        {
            Ok(row) => row,
            Err(e) if is_name_conflict(&e) => return Ok(Some(OutfitWrite::NameTaken)),
            Err(e) => return Err(e),
        };

        let Some(outfit) = updated else {
            return Ok(Some(OutfitWrite::NameTaken));
        };

        sqlx::query("DELETE FROM outfit_items WHERE outfit_id = $1")
            .bind(outfit.id)
            .execute(&mut *tx)
            .await?;
        link_items(&mut tx, outfit.id, &input.items).await?;
        tx.commit().await?;

        Self::with_items(pool, outfit).await.map(|o| Some(OutfitWrite::Saved(o)))
    }

    /// Flip `is_favorite`. Returns the new value, or `None` if not owned.
    pub async fn toggle_favorite(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<bool>, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "UPDATE outfits SET is_favorite = NOT is_favorite, updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING is_favorite",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Copy an owned outfit as `"<name> (Copy)"` with the same items and
    /// `is_favorite = false`. A taken copy name moves on to `(Copy 2)`,
    /// `(Copy 3)`, and so on.
    pub async fn duplicate(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<OutfitWithItems>, sqlx::Error> {
        let Some(source) = Self::find_for_user(pool, id, user_id).await? else {
            return Ok(None);
        };

        let mut tx = pool.begin().await?;
        let insert = format!(
            "INSERT INTO outfits AS o (user_id, name, description, occasion, season, is_favorite) \
             VALUES ($1, $2, $3, $4, $5, FALSE) \
             ON CONFLICT (user_id, name) DO NOTHING \
             RETURNING {COLUMNS}"
        );

        let mut attempt = 1u32;
        let copy = loop {
            let row = sqlx::query_as::<_, Outfit>(&insert)
                .bind(user_id)
                .bind(copy_name(&source.name, attempt))
                .bind(&source.description)
                .bind(&source.occasion)
                .bind(&source.season)
                .fetch_optional(&mut *tx)
                .await?;
            if let Some(row) = row {
                break row;
            }
            tracing::debug!(outfit_id = source.id, attempt, "Copy name taken, trying next");
            attempt += 1;
        };

        sqlx::query(
            "INSERT INTO outfit_items (outfit_id, wardrobe_item_id) \
             SELECT $1, wardrobe_item_id FROM outfit_items WHERE outfit_id = $2",
        )
        .bind(copy.id)
        .bind(source.id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Self::with_items(pool, copy).await.map(Some)
    }

    /// Returns `true` if an owned outfit was deleted.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM outfits WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Link one wardrobe item. Returns `false` if it was already linked.
    pub async fn add_item(
        pool: &PgPool,
        outfit_id: DbId,
        wardrobe_item_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO outfit_items (outfit_id, wardrobe_item_id) VALUES ($1, $2) \
             ON CONFLICT (outfit_id, wardrobe_item_id) DO NOTHING",
        )
        .bind(outfit_id)
        .bind(wardrobe_item_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Outfit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM outfits o WHERE o.id = $1 AND o.user_id = $2");
        sqlx::query_as::<_, Outfit>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find an owned outfit with its items.
    pub async fn find_with_items(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<OutfitWithItems>, sqlx::Error> {
        match Self::find_for_user(pool, id, user_id).await? {
            Some(outfit) => Self::with_items(pool, outfit).await.map(Some),
            None => Ok(None),
        }
    }

    /// Find an outfit by id regardless of owner (forum attachments).
    pub async fn find_public(pool: &PgPool, id: DbId) -> Result<Option<OutfitWithItems>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM outfits o WHERE o.id = $1");
        let outfit = sqlx::query_as::<_, Outfit>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        match outfit {
            Some(outfit) => Self::with_items(pool, outfit).await.map(Some),
            None => Ok(None),
        }
    }

    /// The user's outfits containing a given wardrobe item.
    pub async fn ids_containing_item(
        pool: &PgPool,
        user_id: DbId,
        wardrobe_item_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT o.id FROM outfits o \
             JOIN outfit_items oi ON oi.outfit_id = o.id \
             WHERE o.user_id = $1 AND oi.wardrobe_item_id = $2",
        )
        .bind(user_id)
        .bind(wardrobe_item_id)
        .fetch_all(pool)
        .await
    }

    /// Filtered, sorted outfit listing with items eagerly loaded.
    pub async fn list(
        pool: &PgPool,
        user_id: DbId,
        filter: &OutfitFilter,
    ) -> Result<Vec<OutfitWithItems>, sqlx::Error> {
        let mut conditions = vec!["o.user_id = $1".to_string()];
        let mut bind_idx = 2u32;

        if let Some(collection) = filter.collection {
            conditions.push(criterion_sql(collection.criterion()));
        } else {
            if filter.occasion.is_some() {
                conditions.push(format!("o.occasion = ${bind_idx}"));
                bind_idx += 1;
            }
            if filter.season.is_some() {
                conditions.push(format!("o.season = ${bind_idx}"));
                bind_idx += 1;
            }
            if filter.favorites_only {
                conditions.push("o.is_favorite".to_string());
            }
        }
        if filter.search.is_some() {
            conditions.push(format!(
                "(o.name ILIKE ${bind_idx} OR o.description ILIKE ${bind_idx} \
                  OR o.occasion ILIKE ${bind_idx} OR o.season ILIKE ${bind_idx})"
            ));
        }

        let query = format!(
            "SELECT {COLUMNS}, {ITEM_COUNT_SQL} AS item_count \
             FROM outfits o \
             WHERE {} \
             ORDER BY {}",
            conditions.join(" AND "),
            order_by(filter.sort),
        );

        let mut q = sqlx::query_as::<_, OutfitSummary>(&query).bind(user_id);
        if filter.collection.is_none() {
            if let Some(ref occasion) = filter.occasion {
                q = q.bind(occasion);
            }
            if let Some(ref season) = filter.season {
                q = q.bind(season);
            }
        }
        if let Some(ref term) = filter.search {
            q = q.bind(contains_pattern(term));
        }

        let summaries = q.fetch_all(pool).await?;
        Self::attach_items(pool, summaries).await
    }

    /// Count of the user's outfits in every smart collection, ignoring any
    /// search or listing filter.
    pub async fn collection_counts(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<CollectionCounts, sqlx::Error> {
        let selects: Vec<String> = SmartCollection::ALL
            .iter()
            .map(|c| {
                format!(
                    "COUNT(*) FILTER (WHERE {}) AS \"{}\"",
                    criterion_sql(c.criterion()),
                    c.as_str()
                )
            })
            .collect();
        let query = format!(
            "SELECT {} FROM outfits o WHERE o.user_id = $1",
            selects.join(", ")
        );

        let row = sqlx::query(&query).bind(user_id).fetch_one(pool).await?;
        let mut counts = CollectionCounts::new();
        for collection in SmartCollection::ALL {
            let count: i64 = row.try_get(collection.as_str())?;
            counts.insert(collection.as_str().to_string(), count);
        }
        Ok(counts)
    }

    // -----------------------------------------------------------------------
    // Dashboard aggregates
    // -----------------------------------------------------------------------

    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM outfits WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn favorites_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM outfits WHERE user_id = $1 AND is_favorite",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Non-blank season values with counts, most frequent first.
    pub async fn season_stats(pool: &PgPool, user_id: DbId) -> Result<Vec<StatCount>, sqlx::Error> {
        sqlx::query_as::<_, StatCount>(
            "SELECT season AS key, COUNT(*) AS count FROM outfits \
             WHERE user_id = $1 AND season <> '' \
             GROUP BY season ORDER BY count DESC, season",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Non-blank occasion values with counts, most frequent first.
    pub async fn occasion_stats(pool: &PgPool, user_id: DbId) -> Result<Vec<StatCount>, sqlx::Error> {
        sqlx::query_as::<_, StatCount>(
            "SELECT occasion AS key, COUNT(*) AS count FROM outfits \
             WHERE user_id = $1 AND occasion <> '' \
             GROUP BY occasion ORDER BY count DESC, occasion",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// The user's newest outfits with items.
    pub async fn recent(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<OutfitWithItems>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, {ITEM_COUNT_SQL} AS item_count FROM outfits o \
             WHERE o.user_id = $1 ORDER BY o.created_at DESC, o.id DESC LIMIT $2"
        );
        let summaries = sqlx::query_as::<_, OutfitSummary>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Self::attach_items(pool, summaries).await
    }

    /// One of the user's outfits chosen at random.
    pub async fn random(pool: &PgPool, user_id: DbId) -> Result<Option<OutfitWithItems>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, {ITEM_COUNT_SQL} AS item_count FROM outfits o \
             WHERE o.user_id = $1 ORDER BY random() LIMIT 1"
        );
        let summary = sqlx::query_as::<_, OutfitSummary>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        match summary {
            Some(s) => Ok(Self::attach_items(pool, vec![s]).await?.pop()),
            None => Ok(None),
        }
    }

    // -----------------------------------------------------------------------
    // Item loading
    // -----------------------------------------------------------------------

    async fn with_items(pool: &PgPool, outfit: Outfit) -> Result<OutfitWithItems, sqlx::Error> {
        let mut items = load_items(pool, &[outfit.id]).await?;
        let items = items.remove(&outfit.id).unwrap_or_default();
        Ok(OutfitWithItems {
            outfit,
            item_count: items.len() as i64,
            items,
        })
    }

    async fn attach_items(
        pool: &PgPool,
        summaries: Vec<OutfitSummary>,
    ) -> Result<Vec<OutfitWithItems>, sqlx::Error> {
        let ids: Vec<DbId> = summaries.iter().map(|s| s.outfit.id).collect();
        let mut by_outfit = load_items(pool, &ids).await?;
        Ok(summaries
            .into_iter()
            .map(|s| OutfitWithItems {
                items: by_outfit.remove(&s.outfit.id).unwrap_or_default(),
                item_count: s.item_count,
                outfit: s.outfit,
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Wardrobe items for each outfit id, in the order they were linked.
async fn load_items(
    pool: &PgPool,
    outfit_ids: &[DbId],
) -> Result<HashMap<DbId, Vec<WardrobeItem>>, sqlx::Error> {
    if outfit_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let query = format!(
        "SELECT oi.outfit_id, {ITEM_COLUMNS} \
         FROM outfit_items oi \
         JOIN wardrobe_items w ON w.id = oi.wardrobe_item_id \
         WHERE oi.outfit_id = ANY($1) \
         ORDER BY oi.added_at, w.id"
    );
    let rows = sqlx::query_as::<_, LinkedItem>(&query)
        .bind(outfit_ids)
        .fetch_all(pool)
        .await?;

    let mut grouped: HashMap<DbId, Vec<WardrobeItem>> = HashMap::new();
    for row in rows {
        grouped.entry(row.outfit_id).or_default().push(row.item);
    }
    Ok(grouped)
}

/// Unique violation on the per-user outfit name.
fn is_name_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some("uq_outfits_user_name")
        }
        _ => false,
    }
}

async fn link_items(
    tx: &mut Transaction<'_, Postgres>,
    outfit_id: DbId,
    item_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    if item_ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "INSERT INTO outfit_items (outfit_id, wardrobe_item_id) \
         SELECT $1, UNNEST($2::BIGINT[]) \
         ON CONFLICT (outfit_id, wardrobe_item_id) DO NOTHING",
    )
    .bind(outfit_id)
    .bind(item_ids)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// SQL predicate over the outfit aliased `o`. Every value interpolated here
/// is a compile-time constant from [`CollectionCriterion`].
fn criterion_sql(criterion: CollectionCriterion) -> String {
    match criterion {
        CollectionCriterion::Favorite => "o.is_favorite".to_string(),
        CollectionCriterion::Season(season) => format!("o.season = '{season}'"),
        CollectionCriterion::Occasion(occasion) => format!("o.occasion = '{occasion}'"),
        CollectionCriterion::CreatedWithinDays(days) => {
            format!("o.created_at >= NOW() - INTERVAL '{days} days'")
        }
        CollectionCriterion::ItemCountBelow(n) => format!("{ITEM_COUNT_SQL} < {n}"),
    }
}

fn order_by(sort: OutfitSort) -> &'static str {
    match sort {
        OutfitSort::NameAsc => "o.name ASC, o.id ASC",
        OutfitSort::NameDesc => "o.name DESC, o.id DESC",
        OutfitSort::CreatedAsc => "o.created_at ASC, o.id ASC",
        OutfitSort::CreatedDesc => "o.created_at DESC, o.id DESC",
        OutfitSort::UpdatedAsc => "o.updated_at ASC, o.id ASC",
        OutfitSort::UpdatedDesc => "o.updated_at DESC, o.id DESC",
        OutfitSort::ItemCountAsc => "item_count ASC, o.created_at DESC, o.id DESC",
        OutfitSort::ItemCountDesc => "item_count DESC, o.created_at DESC, o.id DESC",
    }
}
