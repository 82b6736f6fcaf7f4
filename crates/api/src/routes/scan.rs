//! Manual triggers for the inventory scan pipeline.
//!
//! The scheduler covers the periodic case; these routes let an operator run
//! a pass on demand. Responses carry the success counts only — per-candidate
//! failure detail lives in the logs and the audit trail.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;

use crate::error::AppResult;
use crate::state::AppState;

/// Count payload for single-rule runs.
#[derive(Debug, Serialize)]
struct SentResponse {
    sent: u32,
}

/// POST /push/scan/run -- run both rules, return the combined counts.
async fn run_all(State(state): State<AppState>) -> AppResult<impl axum::response::IntoResponse> {
    let summary = state.orchestrator.scan_all().await?;
    Ok(Json(summary))
}

/// POST /push/scan/stock-low -- run the stock-low rule.
async fn run_stock_low(
    State(state): State<AppState>,
) -> AppResult<impl axum::response::IntoResponse> {
    let sent = state.orchestrator.scan_and_notify_stock_low().await?;
    Ok(Json(SentResponse { sent }))
}

/// POST /push/scan/expire-soon -- run the expire-soon rule.
async fn run_expire_soon(
    State(state): State<AppState>,
) -> AppResult<impl axum::response::IntoResponse> {
    let sent = state.orchestrator.scan_and_notify_expire_soon().await?;
    Ok(Json(SentResponse { sent }))
}

/// Scan trigger routes mounted at `/push/scan`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/run", post(run_all))
        .route("/stock-low", post(run_stock_low))
        .route("/expire-soon", post(run_expire_soon))
}
