//! Forum threads and posts.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use best_dressed_core::types::{DbId, Timestamp};

/// A row from the `threads` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Thread {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub content: String,
    pub outfit_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// Thread listing row with author and engagement counts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ThreadSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub thread: Thread,
    pub author: String,
    pub reply_count: i64,
    pub like_count: i64,
    pub is_saved: bool,
}

/// A row from the `posts` table joined with the author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub thread_id: DbId,
    pub user_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
    pub author: String,
    pub like_count: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateThread {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub outfit_id: Option<DbId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePost {
    #[serde(default)]
    pub content: String,
}

/// Like state after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeState {
    pub liked: bool,
    pub like_count: i64,
}
