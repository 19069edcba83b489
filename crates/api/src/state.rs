use std::sync::Arc;

use best_dressed_core::moderation::ContentFilter;

use crate::clients::{MarketplaceApi, StyleAdvisor};
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything beyond the pool sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: best_dressed_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Blocked-content patterns, loaded once at startup.
    pub content_filter: Arc<ContentFilter>,
    pub marketplace: Arc<dyn MarketplaceApi>,
    pub advisor: Arc<dyn StyleAdvisor>,
}
