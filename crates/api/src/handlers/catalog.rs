//! Handlers for the shared catalog: listing, detail, manual add, the
//! per-user hide list, and saving a catalog item into a wardrobe.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use best_dressed_core::catalog::resolve_tag;
use best_dressed_core::error::CoreError;
use best_dressed_core::search::normalize_param;
use best_dressed_core::types::DbId;
use best_dressed_db::models::catalog_item::{CatalogItem, CreateCatalogItem};
use best_dressed_db::models::wardrobe_item::SaveOutcome;
use best_dressed_db::repositories::{CatalogItemRepo, HiddenItemRepo, WardrobeItemRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::query::SearchParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ItemListing {
    pub items: Vec<CatalogItem>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ItemDetail {
    #[serde(flatten)]
    pub item: CatalogItem,
    /// `None` for anonymous visitors.
    pub in_wardrobe: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct HideState {
    pub item_id: DbId,
    pub hidden: bool,
}

// ---------------------------------------------------------------------------
// Browsing
// ---------------------------------------------------------------------------

/// GET /item_listing/
///
/// All catalog items newest-first, minus the viewer's hidden items.
pub async fn item_listing(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let search = normalize_param(params.search.as_deref());
    let items = CatalogItemRepo::list_visible(&state.pool, viewer.user_id(), search.as_deref())
        .await?;

    Ok(Json(DataResponse {
        data: ItemListing { items, search },
    }))
}

/// GET /item/{id}/
pub async fn item_detail(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = CatalogItemRepo::find_by_id(&state.pool, item_id)
        .await?
        .ok_or_else(|| AppError::not_found("CatalogItem", item_id))?;

    let in_wardrobe = match viewer.user_id() {
        Some(user_id) => {
            Some(WardrobeItemRepo::has_catalog_item(&state.pool, user_id, item_id).await?)
        }
        None => None,
    };

    Ok(Json(DataResponse {
        data: ItemDetail { item, in_wardrobe },
    }))
}

/// POST /add_item/
///
/// Create a catalog item by hand. Title and description are required;
/// an absent tag becomes `other`.
pub async fn add_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCatalogItem>,
) -> AppResult<impl IntoResponse> {
    if input.title.trim().is_empty() || input.description.trim().is_empty() {
        return Err(CoreError::Validation("Title and description are required".into()).into());
    }
    let tag = resolve_tag(input.tag.as_deref()).map_err(CoreError::Validation)?;

    let item = CatalogItemRepo::create(
        &state.pool,
        &CreateCatalogItem {
            tag: Some(tag.to_string()),
            ..input
        },
    )
    .await?;

    tracing::info!(catalog_item_id = item.id, user_id = auth.user_id, "Catalog item added");
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

// ---------------------------------------------------------------------------
// Hide list
// ---------------------------------------------------------------------------

/// POST /item/{id}/hide/
pub async fn hide_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_item_exists(&state, item_id).await?;
    HiddenItemRepo::hide(&state.pool, auth.user_id, item_id).await?;

    Ok(Json(DataResponse {
        data: HideState {
            item_id,
            hidden: true,
        },
    }))
}

/// POST /item/{id}/unhide/
pub async fn unhide_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_item_exists(&state, item_id).await?;
    HiddenItemRepo::unhide(&state.pool, auth.user_id, item_id).await?;

    Ok(Json(DataResponse {
        data: HideState {
            item_id,
            hidden: false,
        },
    }))
}

async fn ensure_item_exists(state: &AppState, item_id: DbId) -> AppResult<()> {
    CatalogItemRepo::find_by_id(&state.pool, item_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::not_found("CatalogItem", item_id))
}

// ---------------------------------------------------------------------------
// Save to wardrobe
// ---------------------------------------------------------------------------

/// POST /item/{id}/save/
///
/// Copy a catalog item into the caller's wardrobe. Saving the same item
/// twice is not an error: the second call answers 200 with a notice.
pub async fn save_to_wardrobe(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = CatalogItemRepo::find_by_id(&state.pool, item_id)
        .await?
        .ok_or_else(|| AppError::not_found("CatalogItem", item_id))?;

    let response = match WardrobeItemRepo::save_from_catalog(&state.pool, auth.user_id, &item)
        .await?
    {
        SaveOutcome::Created(saved) => {
            tracing::info!(
                wardrobe_item_id = saved.id,
                catalog_item_id = item_id,
                user_id = auth.user_id,
                "Catalog item saved to wardrobe",
            );
            (
                StatusCode::CREATED,
                Json(MessageResponse::with(
                    format!("\"{}\" was added to your wardrobe.", item.title),
                    saved,
                )),
            )
        }
        SaveOutcome::AlreadyExists => (
            StatusCode::OK,
            Json(MessageResponse {
                message: format!("\"{}\" is already in your wardrobe.", item.title),
                data: None,
            }),
        ),
    };

    Ok(response)
}
