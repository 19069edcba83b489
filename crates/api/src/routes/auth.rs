use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Account routes.
///
/// ```text
/// POST   /accounts/signup/          -> signup
/// GET    /accounts/login/           -> login_page
/// POST   /accounts/login/           -> login
/// POST   /accounts/logout/          -> logout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/accounts/signup/", post(auth::signup))
        .route("/accounts/login/", get(auth::login_page).post(auth::login))
        .route("/accounts/logout/", post(auth::logout))
}
