//! Repository for the append-only `push_send_logs` audit trail.

use sqlx::PgPool;
use toastlab_core::types::DbId;

use crate::models::send_log::{CreateSendLog, SendLog, SendOutcome, SendTarget};

/// Column list for `push_send_logs` queries.
const COLUMNS: &str = "\
    id, app_type, topic, token, title, body, data_json, \
    result_message_id, result_error, sent_at, store_id, member_id, staff_id";

/// Provides append and query operations for dispatch audit rows.
pub struct SendLogRepo;

impl SendLogRepo {
    /// Append one dispatch attempt, returning the generated id.
    pub async fn insert(pool: &PgPool, entry: &CreateSendLog) -> Result<DbId, sqlx::Error> {
        let (topic, token) = match &entry.target {
            SendTarget::Topic(topic) => (Some(topic.as_str()), None),
            SendTarget::Token(token) => (None, Some(token.as_str())),
        };
        let (message_id, error) = match &entry.outcome {
            SendOutcome::Delivered(id) => (Some(id.as_str()), None),
            SendOutcome::Failed(message) => (None, Some(message.as_str())),
        };

        sqlx::query_scalar(
            "INSERT INTO push_send_logs \
                (app_type, topic, token, title, body, data_json, \
                 result_message_id, result_error, store_id, member_id, staff_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING id",
        )
        .bind(&entry.app_type)
        .bind(topic)
        .bind(token)
        .bind(&entry.title)
        .bind(&entry.body)
        .bind(&entry.data_json)
        .bind(message_id)
        .bind(error)
        .bind(entry.store_id)
        .bind(entry.member_id)
        .bind(entry.staff_id)
        .fetch_one(pool)
        .await
    }

    /// List the most recent dispatch attempts, newest first.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<SendLog>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM push_send_logs ORDER BY sent_at DESC, id DESC LIMIT $1");
        sqlx::query_as::<_, SendLog>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
