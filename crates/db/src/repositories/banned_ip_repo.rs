//! Repository for the `banned_ips` table.

use sqlx::PgPool;
use best_dressed_core::types::Timestamp;

use crate::models::banned_ip::BannedIp;

const COLUMNS: &str = "id, ip_address, reason, banned_at, expires_at, active";

pub struct BannedIpRepo;

impl BannedIpRepo {
    /// Ban an address, or re-activate and update an existing ban.
    pub async fn ban(
        pool: &PgPool,
        ip_address: &str,
        reason: Option<&str>,
        expires_at: Option<Timestamp>,
    ) -> Result<BannedIp, sqlx::Error> {
        let query = format!(
            "INSERT INTO banned_ips (ip_address, reason, expires_at) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (ip_address) DO UPDATE SET \
                reason = EXCLUDED.reason, \
                expires_at = EXCLUDED.expires_at, \
                active = TRUE, \
                banned_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BannedIp>(&query)
            .bind(ip_address)
            .bind(reason)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Clear the active flag. Returns `true` if a ban was lifted.
    pub async fn lift(pool: &PgPool, ip_address: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE banned_ips SET active = FALSE WHERE ip_address = $1 AND active")
            .bind(ip_address)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The ban in force for `ip_address` at `now`, if any.
    pub async fn find_active(
        pool: &PgPool,
        ip_address: &str,
        now: Timestamp,
    ) -> Result<Option<BannedIp>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM banned_ips WHERE ip_address = $1");
        let ban = sqlx::query_as::<_, BannedIp>(&query)
            .bind(ip_address)
            .fetch_optional(pool)
            .await?;
        Ok(ban.filter(|b| b.is_active_at(now)))
    }
}
