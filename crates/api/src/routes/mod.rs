pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod forum;
pub mod health;
pub mod marketplace;
pub mod moderation;
pub mod outfits;
pub mod recommendations;
pub mod wardrobe;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree (everything except `/health`).
///
/// Paths keep their trailing slash; each area's router lists its own
/// routes.
///
/// ```text
/// /accounts/...          signup, login, logout
/// /item_listing/, /item/{id}/..., /add_item/
/// /wardrobe/...
/// /outfits/...
/// /dashboard/, /account/
/// /recommendations/...
/// /auth/ebay_market_delete/, /ebay_add_items/, /ajax_add_item/
/// /forum/...
/// /moderation/...
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(catalog::router())
        .merge(wardrobe::router())
        .merge(outfits::router())
        .merge(dashboard::router())
        .merge(recommendations::router())
        .merge(marketplace::router())
        .merge(forum::router())
        .merge(moderation::router())
}
