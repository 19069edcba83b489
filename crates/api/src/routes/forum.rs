use axum::routing::{get, post};
use axum::Router;

use crate::handlers::forum;
use crate::state::AppState;

/// Forum routes.
///
/// ```text
/// GET    /forum/                            -> forum_index
/// GET    /forum/threads/new/                -> new_thread_form
/// POST   /forum/threads/new/                -> create_thread
/// GET    /forum/threads/{id}/               -> thread_detail
/// POST   /forum/threads/{id}/               -> create_post
/// POST   /forum/threads/{id}/edit/          -> edit_thread
/// POST   /forum/threads/{id}/delete/        -> delete_thread
/// POST   /forum/posts/{id}/edit/            -> edit_post
/// POST   /forum/posts/{id}/delete/          -> delete_post
/// POST   /forum/thread/{id}/like/           -> like_thread
/// POST   /forum/post/{id}/like/             -> like_post
/// POST   /forum/thread/{id}/save/           -> save_thread
/// GET    /forum/saved/                      -> saved_threads
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/forum/", get(forum::forum_index))
        .route(
            "/forum/threads/new/",
            get(forum::new_thread_form).post(forum::create_thread),
        )
        .route(
            "/forum/threads/{id}/",
            get(forum::thread_detail).post(forum::create_post),
        )
        .route("/forum/threads/{id}/edit/", post(forum::edit_thread))
        .route("/forum/threads/{id}/delete/", post(forum::delete_thread))
        .route("/forum/posts/{id}/edit/", post(forum::edit_post))
        .route("/forum/posts/{id}/delete/", post(forum::delete_post))
        .route("/forum/thread/{id}/like/", post(forum::like_thread))
        .route("/forum/post/{id}/like/", post(forum::like_post))
        .route("/forum/thread/{id}/save/", post(forum::save_thread))
        .route("/forum/saved/", get(forum::saved_threads))
}
