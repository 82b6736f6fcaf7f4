//! Audit viewer: the most recent dispatch attempts.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use toastlab_db::repositories::SendLogRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the log listing.
#[derive(Debug, Deserialize)]
struct LogQuery {
    limit: Option<i64>,
}

/// GET /push/logs?limit= -- recent send logs, newest first.
///
/// `limit` is clamped to 1..=500.
async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> AppResult<impl axum::response::IntoResponse> {
    let limit = query.limit.unwrap_or(100).clamp(1, 500);
    let rows = SendLogRepo::list_recent(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// Log viewer routes mounted at `/push/logs`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_logs))
}
