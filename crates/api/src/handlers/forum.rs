//! Handlers for the forum: threads, replies, likes, and saved threads.
//!
//! Submissions (new threads, replies, edits) pass through the moderation
//! guards: [`UnbannedUser`] for the caller's address, then
//! [`require_fields`] and [`ensure_clean`] for the text.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use best_dressed_core::types::DbId;
use best_dressed_db::models::forum::{CreatePost, CreateThread, Post, Thread, ThreadSummary};
use best_dressed_db::models::outfit::OutfitWithItems;
use best_dressed_db::repositories::{OutfitRepo, PostRepo, ThreadRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::middleware::moderation::{ensure_clean, require_fields, UnbannedUser};
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ThreadForm {
    pub fields: [&'static str; 3],
}

#[derive(Debug, Serialize)]
pub struct ThreadDetail {
    pub thread: ThreadSummary,
    pub outfit: Option<OutfitWithItems>,
    pub posts: Vec<Post>,
}

#[derive(Debug, Serialize)]
pub struct SaveState {
    pub saved: bool,
}

// ---------------------------------------------------------------------------
// Browsing
// ---------------------------------------------------------------------------

/// GET /forum/
///
/// Threads newest first. `is_saved` is only ever true for signed-in users.
pub async fn forum_index(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let threads = ThreadRepo::list(&state.pool, viewer.user_id()).await?;
    Ok(Json(DataResponse { data: threads }))
}

/// GET /forum/threads/{id}/
///
/// The thread, its attached outfit (if any), and replies oldest first.
pub async fn thread_detail(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(thread_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let thread = ThreadRepo::find_summary(&state.pool, thread_id, viewer.user_id())
        .await?
        .ok_or_else(|| AppError::not_found("Thread", thread_id))?;

    let outfit = match thread.thread.outfit_id {
        Some(outfit_id) => OutfitRepo::find_public(&state.pool, outfit_id).await?,
        None => None,
    };
    let posts = PostRepo::list_for_thread(&state.pool, thread_id).await?;

    Ok(Json(DataResponse {
        data: ThreadDetail {
            thread,
            outfit,
            posts,
        },
    }))
}

/// GET /forum/saved/
pub async fn saved_threads(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let threads = ThreadRepo::list_saved(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: threads }))
}

// ---------------------------------------------------------------------------
// Threads
// ---------------------------------------------------------------------------

/// GET /forum/threads/new/
pub async fn new_thread_form(_auth: AuthUser) -> Json<DataResponse<ThreadForm>> {
    Json(DataResponse {
        data: ThreadForm {
            fields: ["title", "content", "outfit_id"],
        },
    })
}

/// POST /forum/threads/new/
///
/// An attached outfit must belong to the author.
pub async fn create_thread(
    UnbannedUser(auth): UnbannedUser,
    State(state): State<AppState>,
    Json(input): Json<CreateThread>,
) -> AppResult<impl IntoResponse> {
    require_fields(&[input.title.as_str(), input.content.as_str()])?;
    ensure_clean(&state.content_filter, &[input.title.as_str(), input.content.as_str()])?;

    if let Some(outfit_id) = input.outfit_id {
        if OutfitRepo::find_for_user(&state.pool, outfit_id, auth.user_id)
            .await?
            .is_none()
        {
            return Err(AppError::BadRequest(
                "You can only attach your own outfits".into(),
            ));
        }
    }

    let thread = ThreadRepo::create(
        &state.pool,
        auth.user_id,
        &CreateThread {
            title: input.title.trim().to_string(),
            content: input.content.trim().to_string(),
            outfit_id: input.outfit_id,
        },
    )
    .await?;

    tracing::info!(thread_id = thread.id, user_id = auth.user_id, "Thread created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: thread })))
}

/// POST /forum/threads/{id}/edit/
///
/// Author or staff only.
pub async fn edit_thread(
    UnbannedUser(auth): UnbannedUser,
    State(state): State<AppState>,
    Path(thread_id): Path<DbId>,
    Json(input): Json<CreateThread>,
) -> AppResult<impl IntoResponse> {
    find_editable_thread(&state, thread_id, &auth).await?;
    require_fields(&[input.title.as_str(), input.content.as_str()])?;
    ensure_clean(&state.content_filter, &[input.title.as_str(), input.content.as_str()])?;

    let thread = ThreadRepo::update(
        &state.pool,
        thread_id,
        input.title.trim(),
        input.content.trim(),
    )
    .await?
    .ok_or_else(|| AppError::not_found("Thread", thread_id))?;

    tracing::info!(thread_id, user_id = auth.user_id, "Thread updated");
    Ok(Json(DataResponse { data: thread }))
}

/// POST /forum/threads/{id}/delete/
///
/// Author or staff only. Replies go with the thread.
pub async fn delete_thread(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(thread_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_editable_thread(&state, thread_id, &auth).await?;
    if !ThreadRepo::delete(&state.pool, thread_id).await? {
        return Err(AppError::not_found("Thread", thread_id));
    }

    tracing::info!(thread_id, user_id = auth.user_id, "Thread deleted");
    Ok(Json(MessageResponse::text("Thread deleted.")))
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// POST /forum/threads/{id}/
///
/// Reply to a thread.
pub async fn create_post(
    UnbannedUser(auth): UnbannedUser,
    State(state): State<AppState>,
    Path(thread_id): Path<DbId>,
    Json(input): Json<CreatePost>,
) -> AppResult<impl IntoResponse> {
    ThreadRepo::find_by_id(&state.pool, thread_id)
        .await?
        .ok_or_else(|| AppError::not_found("Thread", thread_id))?;
    require_fields(&[input.content.as_str()])?;
    ensure_clean(&state.content_filter, &[input.content.as_str()])?;

    let post = PostRepo::create(
        &state.pool,
        thread_id,
        auth.user_id,
        &CreatePost {
            content: input.content.trim().to_string(),
        },
    )
    .await?;

    tracing::info!(post_id = post.id, thread_id, user_id = auth.user_id, "Post created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: post })))
}

/// POST /forum/posts/{id}/edit/
///
/// Author or staff only.
pub async fn edit_post(
    UnbannedUser(auth): UnbannedUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    Json(input): Json<CreatePost>,
) -> AppResult<impl IntoResponse> {
    find_editable_post(&state, post_id, &auth).await?;
    require_fields(&[input.content.as_str()])?;
    ensure_clean(&state.content_filter, &[input.content.as_str()])?;

    let post = PostRepo::update(&state.pool, post_id, input.content.trim())
        .await?
        .ok_or_else(|| AppError::not_found("Post", post_id))?;

    tracing::info!(post_id, user_id = auth.user_id, "Post updated");
    Ok(Json(DataResponse { data: post }))
}

/// POST /forum/posts/{id}/delete/
///
/// Author or staff only.
pub async fn delete_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_editable_post(&state, post_id, &auth).await?;
    if !PostRepo::delete(&state.pool, post_id).await? {
        return Err(AppError::not_found("Post", post_id));
    }

    tracing::info!(post_id, user_id = auth.user_id, "Post deleted");
    Ok(Json(MessageResponse::text("Post deleted.")))
}

// ---------------------------------------------------------------------------
// Likes and saves
// ---------------------------------------------------------------------------

/// POST /forum/thread/{id}/like/
pub async fn like_thread(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(thread_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ThreadRepo::find_by_id(&state.pool, thread_id)
        .await?
        .ok_or_else(|| AppError::not_found("Thread", thread_id))?;
    let like = ThreadRepo::toggle_like(&state.pool, thread_id, auth.user_id).await?;
    Ok(Json(like))
}

/// POST /forum/post/{id}/like/
pub async fn like_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    PostRepo::find_by_id(&state.pool, post_id)
        .await?
        .ok_or_else(|| AppError::not_found("Post", post_id))?;
    let like = PostRepo::toggle_like(&state.pool, post_id, auth.user_id).await?;
    Ok(Json(like))
}

/// POST /forum/thread/{id}/save/
pub async fn save_thread(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(thread_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ThreadRepo::find_by_id(&state.pool, thread_id)
        .await?
        .ok_or_else(|| AppError::not_found("Thread", thread_id))?;
    let saved = ThreadRepo::toggle_save(&state.pool, thread_id, auth.user_id).await?;
    Ok(Json(SaveState { saved }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Authors and staff may change a row; everyone else gets a 404.
fn can_modify(author_id: DbId, auth: &AuthUser) -> bool {
    author_id == auth.user_id || auth.is_staff
}

async fn find_editable_thread(
    state: &AppState,
    thread_id: DbId,
    auth: &AuthUser,
) -> AppResult<Thread> {
    ThreadRepo::find_by_id(&state.pool, thread_id)
        .await?
        .filter(|t| can_modify(t.user_id, auth))
        .ok_or_else(|| AppError::not_found("Thread", thread_id))
}

async fn find_editable_post(state: &AppState, post_id: DbId, auth: &AuthUser) -> AppResult<Post> {
    PostRepo::find_by_id(&state.pool, post_id)
        .await?
        .filter(|p| can_modify(p.user_id, auth))
        .ok_or_else(|| AppError::not_found("Post", post_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_author_or_staff_may_modify() {
        let author = AuthUser {
            user_id: 1,
            is_staff: false,
        };
        let stranger = AuthUser {
            user_id: 2,
            is_staff: false,
        };
        let moderator = AuthUser {
            user_id: 3,
            is_staff: true,
        };
        assert!(can_modify(1, &author));
        assert!(!can_modify(1, &stranger));
        assert!(can_modify(1, &moderator));
    }
}
