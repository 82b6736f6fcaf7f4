//! Device token registration.
//!
//! Registration upserts by token; unregistration is logical (the token row
//! stays, flagged inactive) so the audit trail keeps its history.

use axum::extract::{Path, State};
use axum::routing::{delete, post};
use axum::{Json, Router};
use serde_json::json;
use toastlab_core::CoreError;
use toastlab_db::models::device_token::RegisterDeviceToken;
use toastlab_db::repositories::DeviceTokenRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

const VALID_APP_TYPES: &[&str] = &["HQ", "STORE"];
const VALID_PLATFORMS: &[&str] = &["ANDROID", "IOS", "WEB"];

/// Maximum provider token length we accept and store.
const MAX_TOKEN_LENGTH: usize = 512;

fn validate(req: &RegisterDeviceToken) -> Result<(), CoreError> {
    if req.token.trim().is_empty() {
        return Err(CoreError::Validation("token must not be empty".into()));
    }
    if req.token.len() > MAX_TOKEN_LENGTH {
        return Err(CoreError::Validation(format!(
            "token exceeds maximum length of {MAX_TOKEN_LENGTH}"
        )));
    }
    if !VALID_APP_TYPES.contains(&req.app_type.as_str()) {
        return Err(CoreError::Validation(format!(
            "app_type must be one of: {}",
            VALID_APP_TYPES.join(", ")
        )));
    }
    if !VALID_PLATFORMS.contains(&req.platform.as_str()) {
        return Err(CoreError::Validation(format!(
            "platform must be one of: {}",
            VALID_PLATFORMS.join(", ")
        )));
    }
    Ok(())
}

/// POST /push/tokens -- register or refresh a device token.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterDeviceToken>,
) -> AppResult<impl axum::response::IntoResponse> {
    validate(&req)?;
    let row = DeviceTokenRepo::register(&state.pool, &req).await?;
    Ok(Json(DataResponse { data: row }))
}

/// DELETE /push/tokens/{token} -- deactivate a device token.
async fn unregister(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    let deactivated = DeviceTokenRepo::deactivate(&state.pool, &token).await?;
    Ok(Json(json!({ "ok": true, "deactivated": deactivated })))
}

/// Token routes mounted at `/push/tokens`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register))
        .route("/{token}", delete(unregister))
}
