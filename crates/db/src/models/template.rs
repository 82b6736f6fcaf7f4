//! Notification template entity model.

use serde::Serialize;
use sqlx::FromRow;
use toastlab_core::types::{DbId, Timestamp};

/// A row from the `push_templates` table.
///
/// Title and body carry `{variableName}` placeholders with no escaping.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationTemplate {
    pub id: DbId,
    pub code: String,
    pub title_template: String,
    pub body_template: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
