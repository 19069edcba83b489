//! Outbound client for the marketplace (eBay) REST APIs.
//!
//! Every call is gated behind an OAuth client-credentials token fetched
//! fresh per operation. Failures are returned to the caller immediately;
//! nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// HTTP request timeout for a single marketplace call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// OAuth scope requested for application tokens.
const OAUTH_SCOPE: &str = "https://api.ebay.com/oauth/api_scope";

/// Description stored when a listing has none.
pub const MISSING_DESCRIPTION: &str = "Ebay Seller did not Provide Description for this item";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MarketplaceConfig {
    /// Pre-shared token mixed into the challenge response.
    pub verification_token: String,
    /// Base64 `client_id:client_secret` for the OAuth token call.
    pub authorization_token: String,
    /// Public URL of the deletion webhook, exactly as registered.
    pub endpoint_url: String,
    /// API root (default: `https://api.ebay.com`).
    pub api_base: String,
}

impl MarketplaceConfig {
    /// Load marketplace settings from environment variables.
    ///
    /// | Env Var                           | Default                                             |
    /// |-----------------------------------|-----------------------------------------------------|
    /// | `EBAY_VERIFICATION_TOKEN`         | empty                                               |
    /// | `EBAY_BASE64_AUTHORIZATION_TOKEN` | empty                                               |
    /// | `EBAY_ENDPOINT_URL`               | `https://best-dressed.net/auth/ebay_market_delete/` |
    /// | `EBAY_API_BASE`                   | `https://api.ebay.com`                              |
    pub fn from_env() -> Self {
        Self {
            verification_token: std::env::var("EBAY_VERIFICATION_TOKEN").unwrap_or_default(),
            authorization_token: std::env::var("EBAY_BASE64_AUTHORIZATION_TOKEN")
                .unwrap_or_default(),
            endpoint_url: std::env::var("EBAY_ENDPOINT_URL")
                .unwrap_or_else(|_| "https://best-dressed.net/auth/ebay_market_delete/".into()),
            api_base: std::env::var("EBAY_API_BASE")
                .unwrap_or_else(|_| "https://api.ebay.com".into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    /// The underlying HTTP request failed (network, DNS, timeout, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The marketplace returned a non-2xx status code.
    #[error("Marketplace returned HTTP {0}")]
    HttpStatus(u16),

    #[error("OAuth token missing from response")]
    MissingToken,
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Response of the notification public-key lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct PublicKeyRecord {
    /// PEM public key, often without line breaks.
    pub key: String,
    #[serde(default)]
    pub algorithm: Option<String>,
    #[serde(default)]
    pub digest: Option<String>,
}

/// A marketplace listing ready to become a catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub item_id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub item_url: Option<String>,
    pub seller_id: Option<String>,
    pub price: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    item_summaries: Vec<ItemSummary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub item_id: String,
    #[serde(default)]
    pub title: String,
    pub price: Option<Price>,
    pub seller: Option<Seller>,
    pub item_web_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    pub value: String,
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Seller {
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetail {
    pub short_description: Option<String>,
    pub image: Option<ItemImage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemImage {
    pub image_url: Option<String>,
}

/// Merge a search hit with its detail record.
///
/// The detail image is preferred; a missing description is replaced by
/// [`MISSING_DESCRIPTION`].
pub fn assemble_listing(summary: ItemSummary, detail: ItemDetail) -> Listing {
    Listing {
        price: summary
            .price
            .map(|p| format!("{} {}", p.value, p.currency)),
        seller_id: summary.seller.and_then(|s| s.username),
        item_url: summary.item_web_url,
        image_url: detail
            .image
            .and_then(|i| i.image_url)
            .unwrap_or_default(),
        description: detail
            .short_description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| MISSING_DESCRIPTION.to_string()),
        title: summary.title,
        item_id: summary.item_id,
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Marketplace operations used by the webhook and the import page.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// Look up the notification public key for `kid`.
    async fn public_key(&self, kid: &str) -> Result<PublicKeyRecord, MarketplaceError>;

    /// Search listings and fetch each hit's detail record.
    async fn search_listings(&self, term: &str, limit: u32)
        -> Result<Vec<Listing>, MarketplaceError>;
}

// ---------------------------------------------------------------------------
// eBay implementation
// ---------------------------------------------------------------------------

pub struct EbayClient {
    config: MarketplaceConfig,
    client: reqwest::Client,
}

impl EbayClient {
    pub fn new(config: MarketplaceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { config, client }
    }

    /// Fetch an application access token (client-credentials grant).
    async fn oauth_token(&self) -> Result<String, MarketplaceError> {
        let url = format!("{}/identity/v1/oauth2/token", self.config.api_base);
        let response = self
            .client
            .post(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Basic {}", self.config.authorization_token),
            )
            .form(&[("grant_type", "client_credentials"), ("scope", OAUTH_SCOPE)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(MarketplaceError::HttpStatus(response.status().as_u16()));
        }

        let token: TokenResponse = response.json().await?;
        tracing::debug!("Marketplace OAuth token acquired");
        token.access_token.ok_or(MarketplaceError::MissingToken)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        token: &str,
    ) -> Result<T, MarketplaceError> {
        let response = request.bearer_auth(token).send().await?;
        if !response.status().is_success() {
            return Err(MarketplaceError::HttpStatus(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl MarketplaceApi for EbayClient {
    async fn public_key(&self, kid: &str) -> Result<PublicKeyRecord, MarketplaceError> {
        let token = self.oauth_token().await?;
        let url = format!(
            "{}/commerce/notification/v1/public_key/{kid}",
            self.config.api_base
        );
        self.get_json(self.client.get(&url), &token).await
    }

    async fn search_listings(
        &self,
        term: &str,
        limit: u32,
    ) -> Result<Vec<Listing>, MarketplaceError> {
        let token = self.oauth_token().await?;
        let url = format!("{}/buy/browse/v1/item_summary/search", self.config.api_base);
        let search: SearchResponse = self
            .get_json(
                self.client
                    .get(&url)
                    .query(&[("q", term.to_string()), ("limit", limit.to_string())]),
                &token,
            )
            .await?;

        let mut listings = Vec::with_capacity(search.item_summaries.len());
        for summary in search.item_summaries {
            let detail_url = format!(
                "{}/buy/browse/v1/item/{}",
                self.config.api_base, summary.item_id
            );
            let detail: ItemDetail = self.get_json(self.client.get(&detail_url), &token).await?;
            listings.push(assemble_listing(summary, detail));
        }
        tracing::info!(term, count = listings.len(), "Marketplace search completed");
        Ok(listings)
    }
}
