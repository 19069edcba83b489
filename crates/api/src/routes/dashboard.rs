use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Dashboard and account settings.
///
/// ```text
/// GET    /dashboard/        -> dashboard
/// GET    /account/          -> account_settings
/// POST   /account/          -> update_account
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard/", get(dashboard::dashboard))
        .route(
            "/account/",
            get(dashboard::account_settings).post(dashboard::update_account),
        )
}
