//! Moderation guards for forum submissions: IP bans, required fields, and
//! the content filter.
//!
//! Every rejection is a `302` to one of the moderation notice pages.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use best_dressed_core::moderation::{client_ip, ContentFilter};
use best_dressed_db::repositories::BannedIpRepo;

use super::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub const IP_BAN_PATH: &str = "/moderation/ip_ban/";
pub const FILTERED_CONTENT_PATH: &str = "/moderation/filtered_content/";
pub const INVALID_POST_PATH: &str = "/moderation/invalid_post/";

/// Caller address: first `X-Forwarded-For` entry, else the socket peer.
///
/// The peer is only known when the server is started with connect info;
/// otherwise the header is the only source.
#[derive(Debug, Clone)]
pub struct ClientIp(pub Option<String>);

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientIp(resolve_client_ip(parts)))
    }
}

fn resolve_client_ip(parts: &Parts) -> Option<String> {
    let forwarded = parts
        .headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok());
    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    client_ip(forwarded, peer)
}

/// Signed-in user whose address is not banned.
///
/// The ban check runs before authentication, so a banned anonymous
/// visitor sees the ban notice rather than the login page.
#[derive(Debug, Clone)]
pub struct UnbannedUser(pub AuthUser);

impl FromRequestParts<AppState> for UnbannedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(ip) = resolve_client_ip(parts) {
            if BannedIpRepo::find_active(&state.pool, &ip, chrono::Utc::now())
                .await?
                .is_some()
            {
                tracing::warn!(ip = %ip, path = %parts.uri.path(), "Blocked submission from banned IP");
                return Err(AppError::Redirect(IP_BAN_PATH));
            }
        }
        AuthUser::from_request_parts(parts, state).await.map(UnbannedUser)
    }
}

/// Redirect to the invalid-post notice if any required field is blank.
pub fn require_fields(fields: &[&str]) -> AppResult<()> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(AppError::Redirect(INVALID_POST_PATH));
    }
    Ok(())
}

/// Redirect to the filtered-content notice if any field is blocked.
pub fn ensure_clean(filter: &ContentFilter, fields: &[&str]) -> AppResult<()> {
    if filter.blocks_any(fields) {
        tracing::info!("Submission rejected by content filter");
        return Err(AppError::Redirect(FILTERED_CONTENT_PATH));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn blank_required_field_is_invalid_post() {
        assert_matches!(
            require_fields(&["title", "  "]),
            Err(AppError::Redirect(INVALID_POST_PATH))
        );
        assert!(require_fields(&["title", "body"]).is_ok());
    }

    #[test]
    fn blocked_content_redirects() {
        let filter = ContentFilter::from_lines("spam\n").unwrap();
        assert_matches!(
            ensure_clean(&filter, &["fine", "spam offer"]),
            Err(AppError::Redirect(FILTERED_CONTENT_PATH))
        );
        assert!(ensure_clean(&filter, &["fine", "no spam here"]).is_ok());
    }

    #[test]
    fn client_ip_prefers_forwarded_header() {
        let request = axum::http::Request::builder()
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))))
            .body(())
            .unwrap();
        let (parts, ()) = request.into_parts();
        assert_eq!(resolve_client_ip(&parts).as_deref(), Some("203.0.113.9"));
    }

    #[test]
    fn client_ip_falls_back_to_peer() {
        let request = axum::http::Request::builder()
            .extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))))
            .body(())
            .unwrap();
        let (parts, ()) = request.into_parts();
        assert_eq!(resolve_client_ip(&parts).as_deref(), Some("127.0.0.1"));
    }
}
