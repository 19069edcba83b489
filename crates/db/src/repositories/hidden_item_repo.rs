//! Repository for the `hidden_items` table (per-user catalog hide list).

use sqlx::PgPool;
use best_dressed_core::types::DbId;

pub struct HiddenItemRepo;

impl HiddenItemRepo {
    /// Hide a catalog item for a user. Returns `false` if it was already
    /// hidden.
    pub async fn hide(
        pool: &PgPool,
        user_id: DbId,
        catalog_item_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO hidden_items (user_id, catalog_item_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, catalog_item_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(catalog_item_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns `true` if a hide-list entry was removed.
    pub async fn unhide(
        pool: &PgPool,
        user_id: DbId,
        catalog_item_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM hidden_items WHERE user_id = $1 AND catalog_item_id = $2")
                .bind(user_id)
                .bind(catalog_item_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
