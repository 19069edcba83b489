use serde::Serialize;
use sqlx::FromRow;
use best_dressed_core::moderation::ban_is_active;
use best_dressed_core::types::{DbId, Timestamp};

/// A row from the `banned_ips` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BannedIp {
    pub id: DbId,
    pub ip_address: String,
    pub reason: Option<String>,
    pub banned_at: Timestamp,
    pub expires_at: Option<Timestamp>,
    pub active: bool,
}

impl BannedIp {
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        ban_is_active(self.active, self.expires_at, now)
    }
}
