//! Topic membership for a member's active device tokens.

use axum::extract::{Path, Query, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use toastlab_core::types::{AppType, DbId};

use crate::error::AppResult;
use crate::state::AppState;

/// Query parameters identifying the member whose tokens change membership.
#[derive(Debug, Deserialize)]
struct MemberQuery {
    member_id: DbId,
}

/// POST /push/topics/{topic}/subscribe?member_id=
async fn subscribe(
    State(state): State<AppState>,
    Path(topic): Path<String>,
    Query(query): Query<MemberQuery>,
) -> AppResult<impl axum::response::IntoResponse> {
    let outcome = state
        .subscriptions
        .subscribe(AppType::Hq, &topic, query.member_id)
        .await?;
    Ok(Json(json!({
        "ok": true,
        "topic": topic,
        "successCount": outcome.success_count,
        "failureCount": outcome.failure_count,
    })))
}

/// POST /push/topics/{topic}/unsubscribe?member_id=
async fn unsubscribe(
    State(state): State<AppState>,
    Path(topic): Path<String>,
    Query(query): Query<MemberQuery>,
) -> AppResult<impl axum::response::IntoResponse> {
    let outcome = state
        .subscriptions
        .unsubscribe(AppType::Hq, &topic, query.member_id)
        .await?;
    Ok(Json(json!({
        "ok": true,
        "topic": topic,
        "successCount": outcome.success_count,
        "failureCount": outcome.failure_count,
    })))
}

/// Subscription routes mounted at `/push/topics`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{topic}/subscribe", post(subscribe))
        .route("/{topic}/unsubscribe", post(unsubscribe))
}
