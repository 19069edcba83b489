use axum::routing::{any, get};
use axum::Router;

use crate::handlers::recommendations;
use crate::state::AppState;

/// Recommendation routes.
///
/// `generate` is mounted for every method so non-POST requests get its
/// JSON 405 envelope rather than an empty one.
///
/// ```text
/// GET    /recommendations/              -> list_recommendations
/// POST   /recommendations/generate/     -> generate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recommendations/", get(recommendations::list_recommendations))
        .route("/recommendations/generate/", any(recommendations::generate))
}
