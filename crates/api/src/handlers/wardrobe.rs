//! Handlers for the signed-in user's wardrobe.
//!
//! Every lookup is scoped to the caller; another user's item id behaves
//! exactly like a missing one (404).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use best_dressed_core::catalog::resolve_tag;
use best_dressed_core::error::CoreError;
use best_dressed_core::outfit::{is_valid_season, OutfitFilter};
use best_dressed_core::types::DbId;
use best_dressed_db::models::outfit::OutfitWithItems;
use best_dressed_db::models::wardrobe_item::{CategoryCount, CreateWardrobeItem, WardrobeItem};
use best_dressed_db::repositories::{OutfitRepo, WardrobeItemRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::WardrobeParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct WardrobePage {
    pub items: Vec<WardrobeItem>,
    pub category_counts: Vec<CategoryCount>,
    pub total_count: i64,
    pub category: String,
    pub search: Option<String>,
    pub sort: &'static str,
}

#[derive(Debug, Serialize)]
pub struct QuickAddPage {
    pub item: WardrobeItem,
    pub outfits: Vec<OutfitWithItems>,
    /// Outfits that already contain the item.
    pub linked_outfit_ids: Vec<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct QuickAddRequest {
    pub outfit_id: DbId,
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// GET /wardrobe/
///
/// The caller's items filtered by `category` and `search`, ordered by
/// `sort`, plus zero-filled per-category counts.
pub async fn list_wardrobe(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<WardrobeParams>,
) -> AppResult<impl IntoResponse> {
    let filter = params.to_filter();

    let items = WardrobeItemRepo::list(&state.pool, auth.user_id, &filter).await?;
    let category_counts = WardrobeItemRepo::category_counts(&state.pool, auth.user_id).await?;
    let total_count = WardrobeItemRepo::count_for_user(&state.pool, auth.user_id).await?;

    Ok(Json(DataResponse {
        data: WardrobePage {
            items,
            category_counts,
            total_count,
            category: filter.category_label().to_string(),
            search: filter.search.clone(),
            sort: filter.sort.as_str(),
        },
    }))
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /wardrobe/add/
///
/// Add a manually entered item.
pub async fn add_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateWardrobeItem>,
) -> AppResult<impl IntoResponse> {
    let input = validate_item(input)?;
    let item = WardrobeItemRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(wardrobe_item_id = item.id, user_id = auth.user_id, "Wardrobe item added");
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// GET /wardrobe/edit/{id}/
pub async fn edit_form(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = find_owned(&state, item_id, auth.user_id).await?;
    Ok(Json(DataResponse { data: item }))
}

/// POST /wardrobe/edit/{id}/
pub async fn edit_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
    Json(input): Json<CreateWardrobeItem>,
) -> AppResult<impl IntoResponse> {
    let input = validate_item(input)?;
    let item = WardrobeItemRepo::update(&state.pool, item_id, auth.user_id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("WardrobeItem", item_id))?;

    tracing::info!(wardrobe_item_id = item_id, user_id = auth.user_id, "Wardrobe item updated");
    Ok(Json(DataResponse { data: item }))
}

/// GET /wardrobe/delete/{id}/
///
/// Confirmation view: the item about to be deleted.
pub async fn delete_form(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = find_owned(&state, item_id, auth.user_id).await?;
    Ok(Json(DataResponse { data: item }))
}

/// POST /wardrobe/delete/{id}/
pub async fn delete_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = find_owned(&state, item_id, auth.user_id).await?;
    if !WardrobeItemRepo::delete(&state.pool, item_id, auth.user_id).await? {
        return Err(AppError::not_found("WardrobeItem", item_id));
    }

    tracing::info!(wardrobe_item_id = item_id, user_id = auth.user_id, "Wardrobe item deleted");
    Ok(Json(MessageResponse::text(format!(
        "\"{}\" has been removed from your wardrobe.",
        item.title
    ))))
}

// ---------------------------------------------------------------------------
// Quick add to outfit
// ---------------------------------------------------------------------------

/// GET /wardrobe/{id}/quick_add/
///
/// The item plus the caller's outfits it could be added to.
pub async fn quick_add_form(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = find_owned(&state, item_id, auth.user_id).await?;
    let outfits = OutfitRepo::list(&state.pool, auth.user_id, &OutfitFilter::default()).await?;
    let linked_outfit_ids =
        OutfitRepo::ids_containing_item(&state.pool, auth.user_id, item_id).await?;

    Ok(Json(DataResponse {
        data: QuickAddPage {
            item,
            outfits,
            linked_outfit_ids,
        },
    }))
}

/// POST /wardrobe/{id}/quick_add/
///
/// Link the item to one of the caller's outfits. Linking twice answers
/// with an "already in" notice.
pub async fn quick_add(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
    Json(input): Json<QuickAddRequest>,
) -> AppResult<impl IntoResponse> {
    let item = find_owned(&state, item_id, auth.user_id).await?;
    let outfit = OutfitRepo::find_for_user(&state.pool, input.outfit_id, auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Outfit", input.outfit_id))?;

    let message = if OutfitRepo::add_item(&state.pool, outfit.id, item.id).await? {
        tracing::info!(
            wardrobe_item_id = item.id,
            outfit_id = outfit.id,
            user_id = auth.user_id,
            "Wardrobe item added to outfit",
        );
        format!("\"{}\" was added to \"{}\".", item.title, outfit.name)
    } else {
        format!("\"{}\" is already in \"{}\".", item.title, outfit.name)
    };

    Ok(Json(MessageResponse::text(message)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_owned(state: &AppState, item_id: DbId, user_id: DbId) -> AppResult<WardrobeItem> {
    WardrobeItemRepo::find_for_user(&state.pool, item_id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("WardrobeItem", item_id))
}

/// Require a title and normalise the category and season.
fn validate_item(input: CreateWardrobeItem) -> Result<CreateWardrobeItem, CoreError> {
    let title = input.title.trim().to_string();
    if title.is_empty() {
        return Err(CoreError::Validation("Title is required".into()));
    }
    let category = resolve_tag(input.category.as_deref()).map_err(CoreError::Validation)?;
    let season = input.season.trim().to_string();
    if !season.is_empty() && !is_valid_season(&season) {
        return Err(CoreError::Validation(format!("Invalid season '{season}'")));
    }

    Ok(CreateWardrobeItem {
        title,
        category: Some(category.to_string()),
        season,
        ..input
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn blank_category_defaults_to_other() {
        let input = CreateWardrobeItem {
            title: "  Linen shirt ".into(),
            ..CreateWardrobeItem::default()
        };
        let validated = validate_item(input).unwrap();
        assert_eq!(validated.title, "Linen shirt");
        assert_eq!(validated.category.as_deref(), Some("other"));
    }

    #[test]
    fn rejects_blank_title_and_unknown_values() {
        assert_matches!(
            validate_item(CreateWardrobeItem::default()),
            Err(CoreError::Validation(_))
        );
        let bad_season = CreateWardrobeItem {
            title: "Boots".into(),
            season: "monsoon".into(),
            ..CreateWardrobeItem::default()
        };
        assert_matches!(validate_item(bad_season), Err(CoreError::Validation(_)));
        let bad_category = CreateWardrobeItem {
            title: "Boots".into(),
            category: Some("socks".into()),
            ..CreateWardrobeItem::default()
        };
        assert_matches!(validate_item(bad_category), Err(CoreError::Validation(_)));
    }
}
