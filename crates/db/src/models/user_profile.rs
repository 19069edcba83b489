use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use best_dressed_core::types::{DbId, Timestamp};

/// A row from the `user_profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProfile {
    pub id: DbId,
    pub user_id: DbId,
    pub bio: String,
    pub style_preferences: String,
    pub favorite_colors: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Account-settings form. Omitted fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserProfile {
    pub bio: Option<String>,
    pub style_preferences: Option<String>,
    pub favorite_colors: Option<String>,
}
