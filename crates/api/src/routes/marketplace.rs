use axum::routing::{any, get, post};
use axum::Router;

use crate::handlers::marketplace;
use crate::state::AppState;

/// Marketplace webhook and listing import.
///
/// ```text
/// ANY    /auth/ebay_market_delete/      -> ebay_market_delete
/// GET    /ebay_add_items/               -> import_form
/// POST   /ebay_add_items/               -> import_listings
/// POST   /ajax_add_item/                -> ajax_add_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/auth/ebay_market_delete/",
            any(marketplace::ebay_market_delete),
        )
        .route(
            "/ebay_add_items/",
            get(marketplace::import_form).post(marketplace::import_listings),
        )
        .route("/ajax_add_item/", post(marketplace::ajax_add_item))
}
