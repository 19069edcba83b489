//! Repository for the `user_profiles` table.

use sqlx::PgPool;
use best_dressed_core::types::DbId;

use crate::models::user_profile::{UpdateUserProfile, UserProfile};

const COLUMNS: &str =
    "id, user_id, bio, style_preferences, favorite_colors, created_at, updated_at";

pub struct UserProfileRepo;

impl UserProfileRepo {
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_profiles WHERE user_id = $1");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Return the user's profile, creating an empty one on first access.
    ///
    /// Concurrent first visits both land on the same row.
    pub async fn get_or_create(pool: &PgPool, user_id: DbId) -> Result<UserProfile, sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_profiles (user_id) VALUES ($1) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM user_profiles WHERE user_id = $1");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Apply the settings form, creating the profile if needed.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateUserProfile,
    ) -> Result<UserProfile, sqlx::Error> {
        Self::get_or_create(pool, user_id).await?;

        let query = format!(
            "UPDATE user_profiles SET \
                bio = COALESCE($2, bio), \
                style_preferences = COALESCE($3, style_preferences), \
                favorite_colors = COALESCE($4, favorite_colors), \
                updated_at = NOW() \
             WHERE user_id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .bind(&input.bio)
            .bind(&input.style_preferences)
            .bind(&input.favorite_colors)
            .fetch_one(pool)
            .await
    }
}
