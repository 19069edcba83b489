//! Notice pages the moderation guards redirect to.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use best_dressed_db::repositories::BannedIpRepo;
use serde_json::json;

use crate::error::AppResult;
use crate::middleware::moderation::ClientIp;
use crate::state::AppState;

/// GET /moderation/ip_ban/
///
/// The reason recorded for the caller's active ban, or null.
pub async fn ip_ban(
    ClientIp(ip): ClientIp,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let ban_reason = match ip {
        Some(ip) => BannedIpRepo::find_active(&state.pool, &ip, chrono::Utc::now())
            .await?
            .and_then(|ban| ban.reason),
        None => None,
    };

    Ok(Json(json!({
        "message": "Your IP address has been banned from posting.",
        "ban_reason": ban_reason,
    })))
}

/// GET /moderation/filtered_content/
pub async fn filtered_content() -> impl IntoResponse {
    Json(json!({
        "message": "Your post contained content that is not allowed and was not published.",
    }))
}

/// GET /moderation/invalid_post/
pub async fn invalid_post() -> impl IntoResponse {
    Json(json!({
        "message": "Your post was missing required fields and was not published.",
    }))
}
