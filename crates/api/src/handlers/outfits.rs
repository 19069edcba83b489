//! Handlers for outfits: filtered listing with smart-collection counts,
//! CRUD, favorite toggling, and duplication.
//!
//! All endpoints require authentication via [`AuthUser`] and only ever
//! see the caller's own outfits.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use best_dressed_core::error::CoreError;
use best_dressed_core::outfit::{is_valid_occasion, is_valid_season};
use best_dressed_core::types::DbId;
use best_dressed_db::models::outfit::{CollectionCounts, CreateOutfit, OutfitWithItems, OutfitWrite};
use best_dressed_db::repositories::{OutfitRepo, WardrobeItemRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::OutfitParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct OutfitPage {
    pub outfits: Vec<OutfitWithItems>,
    pub collection_counts: CollectionCounts,
    pub collection: Option<&'static str>,
    pub occasion: Option<String>,
    pub season: Option<String>,
    pub favorites: bool,
    pub search: Option<String>,
    pub sort: &'static str,
}

/// Outcome of a create or edit. A taken name is reported, not raised.
#[derive(Debug, Serialize)]
pub struct OutfitWriteResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<bool>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outfit: Option<OutfitWithItems>,
}

#[derive(Debug, Serialize)]
pub struct FavoriteToggle {
    pub success: bool,
    pub is_favorite: bool,
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// GET /outfits/
///
/// The caller's outfits after applying `collection` (or the
/// occasion/season/favorites triple), `search`, and `sort`. Collection
/// counts ignore the active filter.
pub async fn list_outfits(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<OutfitParams>,
) -> AppResult<impl IntoResponse> {
    let filter = params.to_filter();

    let outfits = OutfitRepo::list(&state.pool, auth.user_id, &filter).await?;
    let collection_counts = OutfitRepo::collection_counts(&state.pool, auth.user_id).await?;

    Ok(Json(DataResponse {
        data: OutfitPage {
            outfits,
            collection_counts,
            collection: filter.collection.map(|c| c.as_str()),
            occasion: filter.occasion,
            season: filter.season,
            favorites: filter.favorites_only,
            search: filter.search,
            sort: filter.sort.as_str(),
        },
    }))
}

/// GET /outfits/{id}/
pub async fn outfit_detail(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(outfit_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let outfit = find_owned(&state, outfit_id, auth.user_id).await?;
    Ok(Json(DataResponse { data: outfit }))
}

// ---------------------------------------------------------------------------
// Create / edit / delete
// ---------------------------------------------------------------------------

/// POST /outfits/create/
///
/// 201 on success. A name the caller already uses yields 200 with
/// `created: false` and nothing written.
pub async fn create_outfit(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateOutfit>,
) -> AppResult<impl IntoResponse> {
    let input = validate_outfit(&state, auth.user_id, input).await?;

    let response = match OutfitRepo::create(&state.pool, auth.user_id, &input).await? {
        OutfitWrite::Saved(outfit) => {
            tracing::info!(outfit_id = outfit.outfit.id, user_id = auth.user_id, "Outfit created");
            (
                StatusCode::CREATED,
                Json(OutfitWriteResponse {
                    created: Some(true),
                    updated: None,
                    message: format!("Outfit \"{}\" created successfully!", outfit.outfit.name),
                    outfit: Some(outfit),
                }),
            )
        }
        OutfitWrite::NameTaken => (
            StatusCode::OK,
            Json(OutfitWriteResponse {
                created: Some(false),
                updated: None,
                message: name_taken_message(&input.name),
                outfit: None,
            }),
        ),
    };

    Ok(response)
}

/// GET /outfits/{id}/edit/
pub async fn edit_form(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(outfit_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let outfit = find_owned(&state, outfit_id, auth.user_id).await?;
    Ok(Json(DataResponse { data: outfit }))
}

/// POST /outfits/{id}/edit/
///
/// Replace every field and the item set in one transaction.
pub async fn edit_outfit(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(outfit_id): Path<DbId>,
    Json(input): Json<CreateOutfit>,
) -> AppResult<impl IntoResponse> {
    let input = validate_outfit(&state, auth.user_id, input).await?;

    let write = OutfitRepo::update(&state.pool, outfit_id, auth.user_id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Outfit", outfit_id))?;

    let response = match write {
        OutfitWrite::Saved(outfit) => {
            tracing::info!(outfit_id, user_id = auth.user_id, "Outfit updated");
            OutfitWriteResponse {
                created: None,
                updated: Some(true),
                message: format!("Outfit \"{}\" updated successfully!", outfit.outfit.name),
                outfit: Some(outfit),
            }
        }
        OutfitWrite::NameTaken => OutfitWriteResponse {
            created: None,
            updated: Some(false),
            message: name_taken_message(&input.name),
            outfit: None,
        },
    };

    Ok(Json(response))
}

/// POST /outfits/{id}/delete/
pub async fn delete_outfit(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(outfit_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let outfit = OutfitRepo::find_for_user(&state.pool, outfit_id, auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Outfit", outfit_id))?;

    if !OutfitRepo::delete(&state.pool, outfit_id, auth.user_id).await? {
        return Err(AppError::not_found("Outfit", outfit_id));
    }

    tracing::info!(outfit_id, user_id = auth.user_id, "Outfit deleted");
    Ok(Json(MessageResponse::text(format!(
        "Outfit \"{}\" deleted successfully!",
        outfit.name
    ))))
}

// ---------------------------------------------------------------------------
// Favorite / duplicate
// ---------------------------------------------------------------------------

/// POST /outfits/{id}/toggle_favorite/
pub async fn toggle_favorite(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(outfit_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let is_favorite = OutfitRepo::toggle_favorite(&state.pool, outfit_id, auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Outfit", outfit_id))?;

    Ok(Json(FavoriteToggle {
        success: true,
        is_favorite,
    }))
}

/// POST /outfits/{id}/duplicate/
///
/// Copy named `"<name> (Copy)"` (numbered when taken), not a favorite.
pub async fn duplicate_outfit(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(outfit_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let copy = OutfitRepo::duplicate(&state.pool, outfit_id, auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Outfit", outfit_id))?;

    tracing::info!(
        outfit_id,
        copy_id = copy.outfit.id,
        user_id = auth.user_id,
        "Outfit duplicated",
    );
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::with(
            format!("Outfit duplicated as \"{}\".", copy.outfit.name),
            copy,
        )),
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_owned(state: &AppState, outfit_id: DbId, user_id: DbId) -> AppResult<OutfitWithItems> {
    OutfitRepo::find_with_items(&state.pool, outfit_id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Outfit", outfit_id))
}

fn name_taken_message(name: &str) -> String {
    format!("You already have an outfit named \"{name}\". Please choose a different name.")
}

/// Check the form fields and that every linked item belongs to the caller.
async fn validate_outfit(
    state: &AppState,
    user_id: DbId,
    input: CreateOutfit,
) -> AppResult<CreateOutfit> {
    let input = normalize_outfit(input)?;

    let owned = WardrobeItemRepo::owned_ids(&state.pool, user_id, &input.items).await?;
    if let Some(foreign) = input.items.iter().find(|id| !owned.contains(id)) {
        return Err(AppError::BadRequest(format!(
            "Wardrobe item {foreign} is not in your wardrobe"
        )));
    }

    Ok(input)
}

fn normalize_outfit(input: CreateOutfit) -> Result<CreateOutfit, CoreError> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(CoreError::Validation("Outfit name is required".into()));
    }
    let occasion = input.occasion.trim().to_string();
    if !occasion.is_empty() && !is_valid_occasion(&occasion) {
        return Err(CoreError::Validation(format!("Invalid occasion '{occasion}'")));
    }
    let season = input.season.trim().to_string();
    if !season.is_empty() && !is_valid_season(&season) {
        return Err(CoreError::Validation(format!("Invalid season '{season}'")));
    }

    let mut items = input.items;
    items.sort_unstable();
    items.dedup();

    Ok(CreateOutfit {
        name,
        occasion,
        season,
        items,
        ..input
    })
}
