//! Admin test sends, template preview, and the morning reminder.

use std::collections::HashMap;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use toastlab_alerts::reminder::send_morning_reminder;
use toastlab_core::types::AppType;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for a test send.
///
/// `topic: true` dispatches to a broadcast topic, `false` to a single token.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TestSendRequest {
    topic: bool,
    token_or_topic: String,
    title: String,
    body: String,
    #[serde(default)]
    data: HashMap<String, String>,
}

/// Request body for a template preview.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreviewRequest {
    template_code: String,
    #[serde(default)]
    variables: HashMap<String, serde_json::Value>,
}

/// POST /push/send/test -- send a test notification, fail loudly.
async fn send_test(
    State(state): State<AppState>,
    Json(req): Json<TestSendRequest>,
) -> AppResult<impl axum::response::IntoResponse> {
    if req.token_or_topic.trim().is_empty() {
        return Err(AppError::BadRequest("tokenOrTopic must not be empty".into()));
    }

    let message_id = if req.topic {
        state
            .dispatcher
            .send_to_topic(
                AppType::Hq,
                &req.token_or_topic,
                &req.title,
                &req.body,
                &req.data,
            )
            .await?
    } else {
        state
            .dispatcher
            .send_to_token(
                AppType::Hq,
                &req.token_or_topic,
                &req.title,
                &req.body,
                &req.data,
            )
            .await?
    };

    Ok(Json(json!({ "messageId": message_id })))
}

/// POST /push/templates/preview -- render a template without dispatching.
async fn preview_template(
    State(state): State<AppState>,
    Json(req): Json<PreviewRequest>,
) -> AppResult<impl axum::response::IntoResponse> {
    let vars: HashMap<String, String> = req
        .variables
        .into_iter()
        .map(|(key, value)| (key, stringify(value)))
        .collect();

    let title = state.renderer.render_title(&req.template_code, &vars).await?;
    let body = state.renderer.render_body(&req.template_code, &vars).await?;
    Ok(Json(json!({ "title": title, "body": body })))
}

/// POST /push/reminder -- morning reminder to the HQ-wide topic.
async fn reminder(State(state): State<AppState>) -> AppResult<impl axum::response::IntoResponse> {
    send_morning_reminder(&state.dispatcher).await;
    Ok(Json(json!({ "ok": true })))
}

/// Template variables arrive as arbitrary JSON; strings are used verbatim,
/// everything else is rendered through its JSON form.
fn stringify(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Admin send routes (mounted directly under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/push/send/test", post(send_test))
        .route("/push/templates/preview", post(preview_template))
        .route("/push/reminder", post(reminder))
}
