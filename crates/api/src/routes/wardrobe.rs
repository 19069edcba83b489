use axum::routing::{get, post};
use axum::Router;

use crate::handlers::wardrobe;
use crate::state::AppState;

/// Wardrobe routes.
///
/// ```text
/// GET    /wardrobe/                     -> list_wardrobe
/// POST   /wardrobe/add/                 -> add_item
/// GET    /wardrobe/edit/{id}/           -> edit_form
/// POST   /wardrobe/edit/{id}/           -> edit_item
/// GET    /wardrobe/delete/{id}/         -> delete_form
/// POST   /wardrobe/delete/{id}/         -> delete_item
/// GET    /wardrobe/{id}/quick_add/      -> quick_add_form
/// POST   /wardrobe/{id}/quick_add/      -> quick_add
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/wardrobe/", get(wardrobe::list_wardrobe))
        .route("/wardrobe/add/", post(wardrobe::add_item))
        .route(
            "/wardrobe/edit/{id}/",
            get(wardrobe::edit_form).post(wardrobe::edit_item),
        )
        .route(
            "/wardrobe/delete/{id}/",
            get(wardrobe::delete_form).post(wardrobe::delete_item),
        )
        .route(
            "/wardrobe/{id}/quick_add/",
            get(wardrobe::quick_add_form).post(wardrobe::quick_add),
        )
}
