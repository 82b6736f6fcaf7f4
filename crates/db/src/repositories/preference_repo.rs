//! Repository for the `push_preferences` table.

use sqlx::PgPool;
use toastlab_core::types::DbId;

use crate::models::preference::{AlertPreference, UpdatePreference};

/// Column list for `push_preferences` queries.
const COLUMNS: &str = "\
    id, app_type, member_id, cat_notice, cat_stock_low, cat_expire_soon, \
    threshold_days, created_at, updated_at";

/// Provides get/upsert operations for recipient alert preferences.
pub struct PreferenceRepo;

impl PreferenceRepo {
    /// Get the preference row for an owner, or `None` when never written.
    pub async fn get(
        pool: &PgPool,
        app_type: &str,
        member_id: DbId,
    ) -> Result<Option<AlertPreference>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM push_preferences WHERE app_type = $1 AND member_id = $2");
        sqlx::query_as::<_, AlertPreference>(&query)
            .bind(app_type)
            .bind(member_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or update a preference row in a single round-trip.
    ///
    /// Uses `COALESCE` so that omitted fields keep their stored value on
    /// update, and get the documented defaults (`true, true, true, 3`) on
    /// first write.
    pub async fn upsert(
        pool: &PgPool,
        app_type: &str,
        member_id: DbId,
        update: &UpdatePreference,
    ) -> Result<AlertPreference, sqlx::Error> {
        let query = format!(
            "INSERT INTO push_preferences \
                (app_type, member_id, cat_notice, cat_stock_low, cat_expire_soon, threshold_days) \
             VALUES ($1, $2, COALESCE($3, true), COALESCE($4, true), COALESCE($5, true), \
                     COALESCE($6, 3)) \
             ON CONFLICT (app_type, member_id) DO UPDATE SET \
                cat_notice = COALESCE($3, push_preferences.cat_notice), \
                cat_stock_low = COALESCE($4, push_preferences.cat_stock_low), \
                cat_expire_soon = COALESCE($5, push_preferences.cat_expire_soon), \
                threshold_days = COALESCE($6, push_preferences.threshold_days), \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AlertPreference>(&query)
            .bind(app_type)
            .bind(member_id)
            .bind(update.cat_notice)
            .bind(update.cat_stock_low)
            .bind(update.cat_expire_soon)
            .bind(update.threshold_days)
            .fetch_one(pool)
            .await
    }
}
