//! Recipient preference entity model and partial-update DTO.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use toastlab_core::types::{DbId, Timestamp};

/// A row from the `push_preferences` table.
///
/// One row per (app_type, member); first write creates it with all
/// categories enabled and a 3-day expiration threshold.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlertPreference {
    pub id: DbId,
    pub app_type: String,
    pub member_id: DbId,
    pub cat_notice: bool,
    pub cat_stock_low: bool,
    pub cat_expire_soon: bool,
    pub threshold_days: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for a partial preference update. Omitted fields are preserved.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePreference {
    pub cat_notice: Option<bool>,
    pub cat_stock_low: Option<bool>,
    pub cat_expire_soon: Option<bool>,
    pub threshold_days: Option<i32>,
}
