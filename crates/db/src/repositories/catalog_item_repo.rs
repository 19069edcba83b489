//! Repository for the `catalog_items` table.

use sqlx::PgPool;
use best_dressed_core::catalog::{resolve_tag, short_description};
use best_dressed_core::search::contains_pattern;
use best_dressed_core::types::DbId;

use crate::models::catalog_item::{CatalogItem, CreateCatalogItem};

/// Column list for `catalog_items` queries.
const COLUMNS: &str = "\
    id, title, description, short_description, image_url, tag, \
    item_id, item_url, seller_id, created_at";

pub struct CatalogItemRepo;

impl CatalogItemRepo {
    /// Insert a catalog item. An unrecognised tag is stored as `other`.
    pub async fn create(pool: &PgPool, input: &CreateCatalogItem) -> Result<CatalogItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO catalog_items \
                (title, description, short_description, image_url, tag, item_id, item_url, seller_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CatalogItem>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(short_description(&input.description))
            .bind(&input.image_url)
            .bind(resolve_tag(input.tag.as_deref()).unwrap_or("other"))
            .bind(&input.item_id)
            .bind(&input.item_url)
            .bind(&input.seller_id)
            .fetch_one(pool)
            .await
    }

    /// Insert a marketplace listing unless its `item_id` is already in the
    /// catalog. Returns `None` when skipped.
    pub async fn create_if_new(
        pool: &PgPool,
        input: &CreateCatalogItem,
    ) -> Result<Option<CatalogItem>, sqlx::Error> {
        let query = format!(
            "INSERT INTO catalog_items \
                (title, description, short_description, image_url, tag, item_id, item_url, seller_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (item_id) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CatalogItem>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(short_description(&input.description))
            .bind(&input.image_url)
            .bind(resolve_tag(input.tag.as_deref()).unwrap_or("other"))
            .bind(&input.item_id)
            .bind(&input.item_url)
            .bind(&input.seller_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CatalogItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM catalog_items WHERE id = $1");
        sqlx::query_as::<_, CatalogItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists_by_item_id(pool: &PgPool, item_id: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM catalog_items WHERE item_id = $1)")
            .bind(item_id)
            .fetch_one(pool)
            .await
    }

    /// Catalog listing, newest first.
    ///
    /// Items on `viewer`'s hide list are excluded; `search` matches title
    /// or description case-insensitively.
    pub async fn list_visible(
        pool: &PgPool,
        viewer: Option<DbId>,
        search: Option<&str>,
    ) -> Result<Vec<CatalogItem>, sqlx::Error> {
        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if viewer.is_some() {
            conditions.push(format!(
                "NOT EXISTS (SELECT 1 FROM hidden_items h \
                 WHERE h.catalog_item_id = c.id AND h.user_id = ${bind_idx})"
            ));
            bind_idx += 1;
        }
        if search.is_some() {
            conditions.push(format!(
                "(c.title ILIKE ${bind_idx} OR c.description ILIKE ${bind_idx})"
            ));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {cols} FROM catalog_items c {where_clause} \
             ORDER BY c.created_at DESC, c.id DESC",
            cols = prefixed_columns("c"),
        );

        let mut q = sqlx::query_as::<_, CatalogItem>(&query);
        if let Some(user_id) = viewer {
            q = q.bind(user_id);
        }
        if let Some(term) = search {
            q = q.bind(contains_pattern(term));
        }
        q.fetch_all(pool).await
    }

    /// Every catalog item, oldest first, for building advisor prompts.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<CatalogItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM catalog_items ORDER BY id");
        sqlx::query_as::<_, CatalogItem>(&query).fetch_all(pool).await
    }

    /// Delete every item listed by a marketplace seller. Returns the number
    /// of rows removed.
    pub async fn delete_by_seller(pool: &PgPool, seller_id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM catalog_items WHERE seller_id = $1")
            .bind(seller_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// `COLUMNS` qualified with a table alias.
fn prefixed_columns(alias: &str) -> String {
    COLUMNS
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_columns_qualifies_every_column() {
        let cols = prefixed_columns("c");
        assert!(cols.starts_with("c.id, c.title"));
        assert!(cols.ends_with("c.created_at"));
        assert_eq!(cols.matches("c.").count(), 10);
    }
}
