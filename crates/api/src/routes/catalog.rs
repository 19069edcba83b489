use axum::routing::{get, post};
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Catalog routes.
///
/// ```text
/// GET    /item_listing/             -> item_listing
/// GET    /item/{id}/                -> item_detail
/// POST   /item/{id}/save/           -> save_to_wardrobe
/// POST   /item/{id}/hide/           -> hide_item
/// POST   /item/{id}/unhide/         -> unhide_item
/// POST   /add_item/                 -> add_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/item_listing/", get(catalog::item_listing))
        .route("/item/{id}/", get(catalog::item_detail))
        .route("/item/{id}/save/", post(catalog::save_to_wardrobe))
        .route("/item/{id}/hide/", post(catalog::hide_item))
        .route("/item/{id}/unhide/", post(catalog::unhide_item))
        .route("/add_item/", post(catalog::add_item))
}
