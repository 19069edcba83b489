//! Handlers for AI styling recommendations.
//!
//! `generate` answers with its own `{"success": ..}` envelope rather than
//! [`AppError`](crate::error::AppError)'s, since browser scripts key off
//! the `success` flag.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use best_dressed_core::recommendation::{
    build_prompt, order_by_ids, parse_response, PromptItem, StyleProfile,
};
use best_dressed_core::types::DbId;
use best_dressed_db::models::catalog_item::CatalogItem;
use best_dressed_db::repositories::{CatalogItemRepo, RecommendationRepo, UserProfileRepo};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Saved recommendations
// ---------------------------------------------------------------------------

/// GET /recommendations/
///
/// The caller's saved recommendations, newest first, with their items in
/// the order the advisor listed them.
pub async fn list_recommendations(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let recommendations = RecommendationRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: recommendations,
    }))
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub recommendations: String,
    pub items: Vec<CatalogItem>,
    pub recommendation_id: DbId,
}

/// Error half of the generate envelope.
#[derive(Debug)]
pub struct GenerateFailure {
    status: StatusCode,
    error: String,
}

impl GenerateFailure {
    fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
        }
    }
}

impl IntoResponse for GenerateFailure {
    fn into_response(self) -> Response {
        let body = json!({ "success": false, "error": self.error });
        (self.status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for GenerateFailure {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!(error = %err, "Database error while generating recommendation");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "An internal error occurred")
    }
}

/// POST /recommendations/generate/
///
/// Body `{"prompt": "..."}`. Builds the advisor prompt from the caller's
/// profile and the whole catalog, asks the advisor, and persists the
/// cleaned text with the items it named. A failed advisor call persists
/// nothing.
pub async fn generate(
    auth: AuthUser,
    method: Method,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, GenerateFailure> {
    if method != Method::POST {
        return Err(GenerateFailure::new(
            StatusCode::METHOD_NOT_ALLOWED,
            "Only POST requests are allowed",
        ));
    }

    let request: GenerateRequest = serde_json::from_slice(&body)
        .map_err(|_| GenerateFailure::new(StatusCode::BAD_REQUEST, "Invalid JSON data"))?;
    let prompt = request.prompt.trim();
    if prompt.is_empty() {
        return Err(GenerateFailure::new(
            StatusCode::BAD_REQUEST,
            "Prompt is required",
        ));
    }

    let profile = UserProfileRepo::find_by_user(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| {
            GenerateFailure::new(
                StatusCode::NOT_FOUND,
                "User profile not found. Please complete your profile first.",
            )
        })?;

    let catalog = CatalogItemRepo::list_all(&state.pool).await?;
    let prompt_items: Vec<PromptItem<'_>> = catalog
        .iter()
        .map(|item| PromptItem {
            id: item.id,
            title: &item.title,
            description: &item.description,
            tag: &item.tag,
        })
        .collect();
    let style = StyleProfile {
        bio: &profile.bio,
        style_preferences: &profile.style_preferences,
        favorite_colors: &profile.favorite_colors,
    };
    let full_prompt = build_prompt(&style, &prompt_items, prompt);

    let answer = state.advisor.complete(&full_prompt).await.map_err(|e| {
        tracing::error!(error = %e, user_id = auth.user_id, "Recommendation advisor failed");
        GenerateFailure::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error generating recommendations.",
        )
    })?;

    let parsed = parse_response(&answer);
    let items = order_by_ids(&parsed.item_ids, catalog, |item| item.id);
    let item_ids: Vec<DbId> = items.iter().map(|item| item.id).collect();

    let saved = RecommendationRepo::create_with_items(
        &state.pool,
        auth.user_id,
        prompt,
        &parsed.display_text,
        &item_ids,
    )
    .await?;

    tracing::info!(
        recommendation_id = saved.id,
        user_id = auth.user_id,
        item_count = item_ids.len(),
        "Recommendation generated",
    );

    Ok(Json(GenerateResponse {
        success: true,
        recommendations: parsed.display_text,
        items,
        recommendation_id: saved.id,
    }))
}
