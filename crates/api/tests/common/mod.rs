//! Shared helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use best_dressed_api::auth::jwt::{generate_session_token, JwtConfig};
use best_dressed_api::clients::{
    AdvisorConfig, AdvisorError, Listing, MarketplaceApi, MarketplaceConfig, MarketplaceError,
    PublicKeyRecord, StyleAdvisor,
};
use best_dressed_api::config::ServerConfig;
use best_dressed_api::router::build_app_router;
use best_dressed_api::state::AppState;
use best_dressed_core::moderation::ContentFilter;
use best_dressed_db::models::user::{CreateUser, User};
use best_dressed_db::repositories::UserRepo;

pub const VERIFICATION_TOKEN: &str = "test-verification-token";
pub const ENDPOINT_URL: &str = "https://example.test/auth/ebay_market_delete/";

/// Build a test `ServerConfig` with safe defaults.
///
/// Outbound clients point at an unroutable base; tests swap in the stubs
/// below instead.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:8000".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            session_expiry_mins: 60,
        },
        marketplace: MarketplaceConfig {
            verification_token: VERIFICATION_TOKEN.to_string(),
            authorization_token: String::new(),
            endpoint_url: ENDPOINT_URL.to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
        },
        advisor: AdvisorConfig {
            api_key: String::new(),
            api_base: "http://127.0.0.1:9".to_string(),
            model: "test-model".to_string(),
        },
        content_filters_path: "does-not-exist.txt".into(),
    }
}

// ---------------------------------------------------------------------------
// Stub services
// ---------------------------------------------------------------------------

/// Marketplace stand-in. `key: None` makes the key lookup fail.
#[derive(Default, Clone)]
pub struct StubMarketplace {
    pub key: Option<PublicKeyRecord>,
    pub listings: Vec<Listing>,
}

#[async_trait]
impl MarketplaceApi for StubMarketplace {
    async fn public_key(&self, _kid: &str) -> Result<PublicKeyRecord, MarketplaceError> {
        self.key.clone().ok_or(MarketplaceError::HttpStatus(503))
    }

    async fn search_listings(
        &self,
        _term: &str,
        limit: u32,
    ) -> Result<Vec<Listing>, MarketplaceError> {
        Ok(self.listings.iter().take(limit as usize).cloned().collect())
    }
}

/// Advisor stand-in. `reply: None` makes the call fail.
#[derive(Default, Clone)]
pub struct StubAdvisor {
    pub reply: Option<String>,
}

#[async_trait]
impl StyleAdvisor for StubAdvisor {
    async fn complete(&self, _prompt: &str) -> Result<String, AdvisorError> {
        self.reply.clone().ok_or(AdvisorError::EmptyResponse)
    }
}

/// Everything the app reaches outside the database.
#[derive(Default)]
pub struct TestServices {
    pub marketplace: StubMarketplace,
    pub advisor: StubAdvisor,
    pub content_filter: ContentFilter,
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Full application router with stub services and no content filter.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, TestServices::default())
}

/// Full application router using the production middleware stack.
pub fn build_test_app_with(pool: PgPool, services: TestServices) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        content_filter: Arc::new(services.content_filter),
        marketplace: Arc::new(services.marketplace),
        advisor: Arc::new(services.advisor),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Insert a user whose password is [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, username: &str, is_staff: bool) -> User {
    let password_hash = best_dressed_api::auth::password::hash_password(TEST_PASSWORD)
        .expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash,
            is_staff,
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Session token for `user`, signed with the test secret.
pub fn token_for(user: &User) -> String {
    generate_session_token(user.id, user.is_staff, &test_config().jwt)
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should be handled")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST with no body, for toggle-style actions.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::post(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
