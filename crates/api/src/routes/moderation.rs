use axum::routing::get;
use axum::Router;

use crate::handlers::moderation;
use crate::state::AppState;

/// Moderation notice pages.
///
/// ```text
/// GET    /moderation/ip_ban/                -> ip_ban
/// GET    /moderation/filtered_content/      -> filtered_content
/// GET    /moderation/invalid_post/          -> invalid_post
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/moderation/ip_ban/", get(moderation::ip_ban))
        .route(
            "/moderation/filtered_content/",
            get(moderation::filtered_content),
        )
        .route("/moderation/invalid_post/", get(moderation::invalid_post))
}
