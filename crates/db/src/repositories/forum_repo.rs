//! Repositories for forum threads, posts, likes, and saved threads.

use sqlx::PgPool;
use best_dressed_core::types::DbId;

use crate::models::forum::{CreatePost, CreateThread, LikeState, Post, Thread, ThreadSummary};

const THREAD_COLUMNS: &str = "t.id, t.user_id, t.title, t.content, t.outfit_id, t.created_at";

/// Summary projection; `$1` is the viewer id (NULL for anonymous).
const SUMMARY_SELECT: &str = "\
    SELECT t.id, t.user_id, t.title, t.content, t.outfit_id, t.created_at, \
           u.username AS author, \
           (SELECT COUNT(*) FROM posts p WHERE p.thread_id = t.id) AS reply_count, \
           (SELECT COUNT(*) FROM thread_likes l WHERE l.thread_id = t.id) AS like_count, \
           EXISTS (SELECT 1 FROM saved_threads s \
                   WHERE s.thread_id = t.id AND s.user_id = $1) AS is_saved \
    FROM threads t \
    JOIN users u ON u.id = t.user_id";

const POST_SELECT: &str = "\
    SELECT p.id, p.thread_id, p.user_id, p.content, p.created_at, \
           u.username AS author, \
           (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS like_count \
    FROM posts p \
    JOIN users u ON u.id = p.user_id";

// ---------------------------------------------------------------------------
// Threads
// ---------------------------------------------------------------------------

pub struct ThreadRepo;

impl ThreadRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateThread,
    ) -> Result<Thread, sqlx::Error> {
        let query = format!(
            "INSERT INTO threads AS t (user_id, title, content, outfit_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {THREAD_COLUMNS}"
        );
        sqlx::query_as::<_, Thread>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.outfit_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Thread>, sqlx::Error> {
        let query = format!("SELECT {THREAD_COLUMNS} FROM threads t WHERE t.id = $1");
        sqlx::query_as::<_, Thread>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One thread's summary as seen by `viewer`.
    pub async fn find_summary(
        pool: &PgPool,
        id: DbId,
        viewer: Option<DbId>,
    ) -> Result<Option<ThreadSummary>, sqlx::Error> {
        let query = format!("{SUMMARY_SELECT} WHERE t.id = $2");
        sqlx::query_as::<_, ThreadSummary>(&query)
            .bind(viewer)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All threads, newest first.
    pub async fn list(pool: &PgPool, viewer: Option<DbId>) -> Result<Vec<ThreadSummary>, sqlx::Error> {
        let query = format!("{SUMMARY_SELECT} ORDER BY t.created_at DESC, t.id DESC");
        sqlx::query_as::<_, ThreadSummary>(&query)
            .bind(viewer)
            .fetch_all(pool)
            .await
    }

    /// Threads the user saved, most recently saved first.
    pub async fn list_saved(pool: &PgPool, user_id: DbId) -> Result<Vec<ThreadSummary>, sqlx::Error> {
        let query = format!(
            "{SUMMARY_SELECT} \
             JOIN saved_threads saved ON saved.thread_id = t.id AND saved.user_id = $1 \
             ORDER BY saved.created_at DESC, t.id DESC"
        );
        sqlx::query_as::<_, ThreadSummary>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        title: &str,
        content: &str,
    ) -> Result<Option<Thread>, sqlx::Error> {
        let query = format!(
            "UPDATE threads AS t SET title = $2, content = $3 WHERE t.id = $1 \
             RETURNING {THREAD_COLUMNS}"
        );
        sqlx::query_as::<_, Thread>(&query)
            .bind(id)
            .bind(title)
            .bind(content)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM threads WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Like or unlike a thread for `user_id`.
    pub async fn toggle_like(
        pool: &PgPool,
        thread_id: DbId,
        user_id: DbId,
    ) -> Result<LikeState, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let removed = sqlx::query("DELETE FROM thread_likes WHERE thread_id = $1 AND user_id = $2")
            .bind(thread_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if removed == 0 {
            sqlx::query(
                "INSERT INTO thread_likes (thread_id, user_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(thread_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }
        let like_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM thread_likes WHERE thread_id = $1")
                .bind(thread_id)
                .fetch_one(&mut *tx)
                .await?;
        tx.commit().await?;

        Ok(LikeState {
            liked: removed == 0,
            like_count,
        })
    }

    /// Save or unsave a thread. Returns the new saved state.
    pub async fn toggle_save(
        pool: &PgPool,
        thread_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let removed = sqlx::query("DELETE FROM saved_threads WHERE thread_id = $1 AND user_id = $2")
            .bind(thread_id)
            .bind(user_id)
            .execute(pool)
            .await?
            .rows_affected();
        if removed > 0 {
            return Ok(false);
        }
        sqlx::query(
            "INSERT INTO saved_threads (thread_id, user_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(thread_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

pub struct PostRepo;

impl PostRepo {
    pub async fn create(
        pool: &PgPool,
        thread_id: DbId,
        user_id: DbId,
        input: &CreatePost,
    ) -> Result<Post, sqlx::Error> {
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO posts (thread_id, user_id, content) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(thread_id)
        .bind(user_id)
        .bind(&input.content)
        .fetch_one(pool)
        .await?;

        let query = format!("{POST_SELECT} WHERE p.id = $1");
        sqlx::query_as::<_, Post>(&query).bind(id).fetch_one(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("{POST_SELECT} WHERE p.id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replies to a thread, oldest first.
    pub async fn list_for_thread(pool: &PgPool, thread_id: DbId) -> Result<Vec<Post>, sqlx::Error> {
        let query = format!("{POST_SELECT} WHERE p.thread_id = $1 ORDER BY p.created_at, p.id");
        sqlx::query_as::<_, Post>(&query)
            .bind(thread_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(pool: &PgPool, id: DbId, content: &str) -> Result<Option<Post>, sqlx::Error> {
        let updated = sqlx::query("UPDATE posts SET content = $2 WHERE id = $1")
            .bind(id)
            .bind(content)
            .execute(pool)
            .await?
            .rows_affected();
        if updated == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Like or unlike a post for `user_id`.
    pub async fn toggle_like(
        pool: &PgPool,
        post_id: DbId,
        user_id: DbId,
    ) -> Result<LikeState, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let removed = sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if removed == 0 {
            sqlx::query(
                "INSERT INTO post_likes (post_id, user_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }
        let like_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM post_likes WHERE post_id = $1")
                .bind(post_id)
                .fetch_one(&mut *tx)
                .await?;
        tx.commit().await?;

        Ok(LikeState {
            liked: removed == 0,
            like_count,
        })
    }
}
