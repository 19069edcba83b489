use axum::routing::{get, post};
use axum::Router;

use crate::handlers::outfits;
use crate::state::AppState;

/// Outfit routes.
///
/// ```text
/// GET    /outfits/                          -> list_outfits
/// POST   /outfits/create/                   -> create_outfit
/// GET    /outfits/{id}/                     -> outfit_detail
/// GET    /outfits/{id}/edit/                -> edit_form
/// POST   /outfits/{id}/edit/                -> edit_outfit
/// POST   /outfits/{id}/delete/              -> delete_outfit
/// POST   /outfits/{id}/toggle_favorite/     -> toggle_favorite
/// POST   /outfits/{id}/duplicate/           -> duplicate_outfit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/outfits/", get(outfits::list_outfits))
        .route("/outfits/create/", post(outfits::create_outfit))
        .route("/outfits/{id}/", get(outfits::outfit_detail))
        .route(
            "/outfits/{id}/edit/",
            get(outfits::edit_form).post(outfits::edit_outfit),
        )
        .route("/outfits/{id}/delete/", post(outfits::delete_outfit))
        .route(
            "/outfits/{id}/toggle_favorite/",
            post(outfits::toggle_favorite),
        )
        .route("/outfits/{id}/duplicate/", post(outfits::duplicate_outfit))
}
