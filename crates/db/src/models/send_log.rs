//! Send log entity model and the insert-side types.
//!
//! The insert DTO carries the target and the outcome as enums so a log row
//! can never end up with both (or neither) of topic/token, nor both of
//! message-id/error — the invariant the table's CHECK constraints also
//! enforce.

use serde::Serialize;
use sqlx::FromRow;
use toastlab_core::types::{DbId, Timestamp};

/// A row from the `push_send_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SendLog {
    pub id: DbId,
    pub app_type: String,
    pub topic: Option<String>,
    pub token: Option<String>,
    pub title: String,
    pub body: String,
    pub data_json: Option<String>,
    pub result_message_id: Option<String>,
    pub result_error: Option<String>,
    pub sent_at: Timestamp,
    pub store_id: Option<DbId>,
    pub member_id: Option<DbId>,
    pub staff_id: Option<DbId>,
}

/// Where a dispatch attempt was addressed.
#[derive(Debug, Clone)]
pub enum SendTarget {
    Topic(String),
    Token(String),
}

/// How a dispatch attempt ended.
#[derive(Debug, Clone)]
pub enum SendOutcome {
    /// Provider accepted the message; carries the provider message id.
    Delivered(String),
    /// Provider call failed; carries the failure message.
    Failed(String),
}

/// DTO for appending one dispatch attempt to the audit trail.
#[derive(Debug, Clone)]
pub struct CreateSendLog {
    pub app_type: String,
    pub target: SendTarget,
    pub title: String,
    pub body: String,
    pub data_json: Option<String>,
    pub outcome: SendOutcome,
    pub store_id: Option<DbId>,
    pub member_id: Option<DbId>,
    pub staff_id: Option<DbId>,
}
