//! Handlers for the dashboard and account settings.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use best_dressed_core::error::CoreError;
use best_dressed_db::models::outfit::{OutfitWithItems, StatCount};
use best_dressed_db::models::user_profile::{UpdateUserProfile, UserProfile};
use best_dressed_db::repositories::{OutfitRepo, UserProfileRepo, UserRepo, WardrobeItemRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Outfits shown in the dashboard's "recent" strip.
const RECENT_OUTFITS: i64 = 6;

/// Longest bio accepted by the settings form.
pub const MAX_BIO_LENGTH: usize = 500;

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub username: String,
    pub profile: UserProfile,
    pub wardrobe_count: i64,
    pub outfit_count: i64,
    pub favorites_count: i64,
    pub season_stats: Vec<StatCount>,
    pub occasion_stats: Vec<StatCount>,
    pub recent_outfits: Vec<OutfitWithItems>,
    pub random_outfit: Option<OutfitWithItems>,
}

/// GET /dashboard/
///
/// Profile (created on first visit) plus wardrobe and outfit statistics.
pub async fn dashboard(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", auth.user_id))?;
    let profile = UserProfileRepo::get_or_create(&state.pool, auth.user_id).await?;

    let wardrobe_count = WardrobeItemRepo::count_for_user(&state.pool, auth.user_id).await?;
    let outfit_count = OutfitRepo::count_for_user(&state.pool, auth.user_id).await?;
    let favorites_count = OutfitRepo::favorites_count(&state.pool, auth.user_id).await?;
    let season_stats = OutfitRepo::season_stats(&state.pool, auth.user_id).await?;
    let occasion_stats = OutfitRepo::occasion_stats(&state.pool, auth.user_id).await?;
    let recent_outfits = OutfitRepo::recent(&state.pool, auth.user_id, RECENT_OUTFITS).await?;
    let random_outfit = OutfitRepo::random(&state.pool, auth.user_id).await?;

    Ok(Json(DataResponse {
        data: Dashboard {
            username: user.username,
            profile,
            wardrobe_count,
            outfit_count,
            favorites_count,
            season_stats,
            occasion_stats,
            recent_outfits,
            random_outfit,
        },
    }))
}

/// GET /account/
pub async fn account_settings(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let profile = UserProfileRepo::get_or_create(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// POST /account/
///
/// Update bio, style preferences, and favorite colors. Omitted fields are
/// left unchanged.
pub async fn update_account(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateUserProfile>,
) -> AppResult<impl IntoResponse> {
    if let Some(bio) = &input.bio {
        if bio.chars().count() > MAX_BIO_LENGTH {
            return Err(CoreError::Validation(format!(
                "Bio must be at most {MAX_BIO_LENGTH} characters"
            ))
            .into());
        }
    }

    let profile = UserProfileRepo::update(&state.pool, auth.user_id, &input).await?;

    tracing::info!(user_id = auth.user_id, "Account settings updated");
    Ok(Json(MessageResponse::with(
        "Your profile has been updated!",
        profile,
    )))
}
