//! Repository for the `push_device_tokens` table.

use sqlx::PgPool;
use toastlab_core::types::DbId;

use crate::models::device_token::{DeviceToken, RegisterDeviceToken};

/// Column list for `push_device_tokens` queries.
const COLUMNS: &str = "\
    id, app_type, platform, token, device_id, member_id, store_id, staff_id, \
    is_active, last_seen_at, created_at, updated_at";

/// Provides registration and lookup operations for device tokens.
pub struct DeviceTokenRepo;

impl DeviceTokenRepo {
    /// Register a token, or refresh an existing registration.
    ///
    /// Upserts on the unique token: re-registration updates the app,
    /// platform, and owner columns, reactivates the token, and bumps
    /// `last_seen_at`.
    pub async fn register(
        pool: &PgPool,
        req: &RegisterDeviceToken,
    ) -> Result<DeviceToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO push_device_tokens \
                (app_type, platform, token, device_id, member_id, store_id, staff_id, \
                 is_active, last_seen_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, true, NOW()) \
             ON CONFLICT (token) DO UPDATE SET \
                app_type = EXCLUDED.app_type, \
                platform = EXCLUDED.platform, \
                device_id = EXCLUDED.device_id, \
                member_id = EXCLUDED.member_id, \
                store_id = EXCLUDED.store_id, \
                staff_id = EXCLUDED.staff_id, \
                is_active = true, \
                last_seen_at = NOW(), \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DeviceToken>(&query)
            .bind(&req.app_type)
            .bind(&req.platform)
            .bind(&req.token)
            .bind(&req.device_id)
            .bind(req.member_id)
            .bind(req.store_id)
            .bind(req.staff_id)
            .fetch_one(pool)
            .await
    }

    /// Logically unregister a token.
    ///
    /// Returns `true` if an active token was found and deactivated.
    pub async fn deactivate(pool: &PgPool, token: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE push_device_tokens \
             SET is_active = false, last_seen_at = NOW(), updated_at = NOW() \
             WHERE token = $1 AND is_active = true",
        )
        .bind(token)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Active token strings owned by a member within an app.
    pub async fn find_active_for_member(
        pool: &PgPool,
        app_type: &str,
        member_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT token FROM push_device_tokens \
             WHERE app_type = $1 AND is_active = true AND member_id = $2",
        )
        .bind(app_type)
        .bind(member_id)
        .fetch_all(pool)
        .await
    }

    /// Active token strings for an app, capped at `limit` rows.
    pub async fn find_active_by_app_type(
        pool: &PgPool,
        app_type: &str,
        limit: i64,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT token FROM push_device_tokens \
             WHERE app_type = $1 AND is_active = true \
             LIMIT $2",
        )
        .bind(app_type)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
