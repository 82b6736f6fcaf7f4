//! Device token entity model and registration DTO.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use toastlab_core::types::{DbId, Timestamp};

/// A row from the `push_device_tokens` table.
///
/// Tokens are never hard-deleted; unregistration flips `is_active` so the
/// dispatch and subscription queries stop seeing them.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeviceToken {
    pub id: DbId,
    pub app_type: String,
    pub platform: String,
    pub token: String,
    pub device_id: Option<String>,
    pub member_id: Option<DbId>,
    pub store_id: Option<DbId>,
    pub staff_id: Option<DbId>,
    pub is_active: bool,
    pub last_seen_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering (or refreshing) a device token.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterDeviceToken {
    pub app_type: String,
    pub platform: String,
    pub token: String,
    pub device_id: Option<String>,
    pub member_id: Option<DbId>,
    pub store_id: Option<DbId>,
    pub staff_id: Option<DbId>,
}
