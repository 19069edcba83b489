//! Handlers for the marketplace integration: the account-deletion webhook
//! and importing marketplace listings into the catalog.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use best_dressed_core::catalog::MARKETPLACE_TAG;
use best_dressed_core::error::CoreError;
use best_dressed_core::marketplace::{
    challenge_response, verify_signature, DigestAlgorithm, SignatureError, SignatureHeader,
    SIGNATURE_HEADER,
};
use best_dressed_core::types::DbId;
use best_dressed_db::models::catalog_item::CreateCatalogItem;
use best_dressed_db::repositories::CatalogItemRepo;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::clients::{Listing, MarketplaceError};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Upper bound on listings fetched per import.
pub const MAX_IMPORT_COUNT: u32 = 50;

/// Longest accepted search term.
pub const MAX_SEARCH_TERM_LENGTH: usize = 100;

const INVALID_SIGNATURE: &str = "Invalid public key or Signature";

// ---------------------------------------------------------------------------
// Account-deletion webhook
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ChallengeParams {
    pub challenge_code: Option<String>,
}

/// GET|POST /auth/ebay_market_delete/
///
/// - `?challenge_code=` answers the endpoint-ownership handshake.
/// - `POST` verifies the signed notification, then deletes the notified
///   seller's catalog items.
/// - Anything else is a 400.
pub async fn ebay_market_delete(
    method: Method,
    State(state): State<AppState>,
    Query(params): Query<ChallengeParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(challenge) = params.challenge_code {
        let config = &state.config.marketplace;
        let hash = challenge_response(&challenge, &config.verification_token, &config.endpoint_url);
        return Json(json!({ "challengeResponse": hash })).into_response();
    }

    if method != Method::POST {
        return StatusCode::BAD_REQUEST.into_response();
    }

    match verify_notification(&state, &headers, &body).await {
        Ok(()) => {}
        Err(Verification::Rejected(err)) => {
            tracing::warn!(error = %err, "Marketplace notification failed verification");
            return (
                StatusCode::PRECONDITION_FAILED,
                Json(json!({ "error": INVALID_SIGNATURE })),
            )
                .into_response();
        }
        Err(Verification::KeyLookup(err)) => {
            tracing::error!(
                error = %err,
                "Marketplace account deletion: error performing validation",
            );
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))).into_response();
        }
    }

    match process_deletion(&state, &body).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => err.into_response(),
    }
}

enum Verification {
    /// Header, key, or signature did not check out (412).
    Rejected(SignatureError),
    /// The key could not be fetched (500).
    KeyLookup(MarketplaceError),
}

async fn verify_notification(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), Verification> {
    let raw = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            Verification::Rejected(SignatureError::MalformedHeader("header missing".into()))
        })?;
    let header = SignatureHeader::decode(raw).map_err(Verification::Rejected)?;

    let key = state
        .marketplace
        .public_key(&header.kid)
        .await
        .map_err(Verification::KeyLookup)?;

    let digest = DigestAlgorithm::select(header.digest.as_deref(), key.digest.as_deref())
        .map_err(Verification::Rejected)?;
    verify_signature(&key.key, &header.signature, body, digest).map_err(Verification::Rejected)
}

/// Delete every catalog item listed by the notified seller.
async fn process_deletion(state: &AppState, body: &[u8]) -> AppResult<()> {
    let payload: Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "Verified marketplace notification is not JSON");
            return Ok(());
        }
    };

    let Some(username) = notified_username(&payload) else {
        tracing::warn!("Marketplace notification carried no username; nothing deleted");
        return Ok(());
    };

    let deleted = CatalogItemRepo::delete_by_seller(&state.pool, username).await?;
    tracing::warn!(seller_id = %username, deleted, "Deleted catalog items for marketplace seller");
    Ok(())
}

/// `notification.data.username`, else a top-level `username`.
fn notified_username(payload: &Value) -> Option<&str> {
    payload
        .pointer("/notification/data/username")
        .and_then(Value::as_str)
        .or_else(|| payload.get("username").and_then(Value::as_str))
        .filter(|u| !u.is_empty())
}

// ---------------------------------------------------------------------------
// Listing import
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ImportForm {
    pub fields: [&'static str; 2],
    pub max_item_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    #[serde(default)]
    pub search_term: String,
    #[serde(default = "default_item_count")]
    pub item_count: u32,
}

fn default_item_count() -> u32 {
    10
}

#[derive(Debug, Serialize)]
pub struct ImportedListing {
    #[serde(flatten)]
    pub listing: Listing,
    /// Tripped the content filter; never inserted.
    pub flagged: bool,
    /// Catalog id when this call inserted the listing.
    pub catalog_item_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
pub struct ImportResult {
    pub search_term: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub results: Vec<ImportedListing>,
    pub added: usize,
}

/// GET /ebay_add_items/
///
/// Describes the import form.
pub async fn import_form(_auth: AuthUser) -> Json<DataResponse<ImportForm>> {
    Json(DataResponse {
        data: ImportForm {
            fields: ["search_term", "item_count"],
            max_item_count: MAX_IMPORT_COUNT,
        },
    })
}

/// POST /ebay_add_items/
///
/// Search the marketplace and insert new, unflagged listings into the
/// catalog. An inappropriate search term is refused without contacting
/// the marketplace.
pub async fn import_listings(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ImportRequest>,
) -> AppResult<impl IntoResponse> {
    let term = input.search_term.trim().to_string();
    if term.is_empty() || term.chars().count() > MAX_SEARCH_TERM_LENGTH {
        return Err(CoreError::Validation(format!(
            "Search term must be 1 to {MAX_SEARCH_TERM_LENGTH} characters"
        ))
        .into());
    }
    if !(1..=MAX_IMPORT_COUNT).contains(&input.item_count) {
        return Err(CoreError::Validation(format!(
            "Item count must be between 1 and {MAX_IMPORT_COUNT}"
        ))
        .into());
    }

    if state.content_filter.flags(&term) {
        tracing::info!(user_id = auth.user_id, "Marketplace search term rejected by content filter");
        return Ok(Json(DataResponse {
            data: ImportResult {
                search_term: term,
                warning: Some("Inappropriate search term entered.".into()),
                results: Vec::new(),
                added: 0,
            },
        }));
    }

    let listings = state
        .marketplace
        .search_listings(&term, input.item_count)
        .await
        .map_err(|e| AppError::Upstream(format!("Marketplace search failed: {e}")))?;

    let mut results = Vec::with_capacity(listings.len());
    for listing in listings {
        let flagged = state.content_filter.flags(&listing.title)
            || state.content_filter.flags(&listing.description);
        let catalog_item_id = if flagged {
            None
        } else {
            CatalogItemRepo::create_if_new(&state.pool, &listing_to_catalog(&listing))
                .await?
                .map(|item| item.id)
        };
        results.push(ImportedListing {
            listing,
            flagged,
            catalog_item_id,
        });
    }

    let added = results.iter().filter(|r| r.catalog_item_id.is_some()).count();
    tracing::info!(user_id = auth.user_id, added, total = results.len(), "Marketplace listings imported");

    Ok(Json(DataResponse {
        data: ImportResult {
            search_term: term,
            warning: None,
            results,
            added,
        },
    }))
}

fn listing_to_catalog(listing: &Listing) -> CreateCatalogItem {
    CreateCatalogItem {
        title: listing.title.clone(),
        description: listing.description.clone(),
        image_url: listing.image_url.clone(),
        tag: Some(MARKETPLACE_TAG.to_string()),
        item_id: Some(listing.item_id.clone()),
        item_url: listing.item_url.clone(),
        seller_id: listing.seller_id.clone(),
    }
}

// ---------------------------------------------------------------------------
// Single add
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct AjaxAddItem {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub item_id: Option<String>,
    pub item_url: Option<String>,
    pub seller_id: Option<String>,
}

/// POST /ajax_add_item/
///
/// Insert one listing chosen from the import results. A marketplace
/// `item_id` already in the catalog is reported, not inserted again.
pub async fn ajax_add_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<AjaxAddItem>,
) -> AppResult<Response> {
    let (Some(title), Some(description)) = (
        input.title.filter(|t| !t.trim().is_empty()),
        input.description.filter(|d| !d.trim().is_empty()),
    ) else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing required fields" })),
        )
            .into_response());
    };
    let item_id = input.item_id.filter(|id| !id.is_empty());

    let already_exists = Json(json!({ "error": "Item already exists in catalog." }));
    if let Some(id) = &item_id {
        if CatalogItemRepo::exists_by_item_id(&state.pool, id).await? {
            return Ok(already_exists.into_response());
        }
    }

    let created = CatalogItemRepo::create_if_new(
        &state.pool,
        &CreateCatalogItem {
            title,
            description,
            image_url: input.image_url.unwrap_or_default(),
            tag: Some(MARKETPLACE_TAG.to_string()),
            item_id,
            item_url: input.item_url,
            seller_id: input.seller_id,
        },
    )
    .await?;

    match created {
        Some(item) => {
            tracing::info!(catalog_item_id = item.id, user_id = auth.user_id, "Marketplace item added");
            Ok(Json(json!({ "message": "Item added successfully", "id": item.id })).into_response())
        }
        None => Ok(already_exists.into_response()),
    }
}
