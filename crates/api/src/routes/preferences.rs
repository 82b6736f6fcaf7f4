//! Recipient alert preferences for HQ members.
//!
//! The store keeps one row per member with category opt-in flags and the
//! expiration-threshold-days setting; a partial PUT leaves omitted fields
//! untouched. GET returns `null` data when the member never wrote a row —
//! defaulting is the caller's concern.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use toastlab_core::types::{AppType, DbId};
use toastlab_core::CoreError;
use toastlab_db::models::preference::UpdatePreference;
use toastlab_db::repositories::PreferenceRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /push/preferences/{member_id} -- the member's preference row, if any.
async fn get_preference(
    State(state): State<AppState>,
    Path(member_id): Path<DbId>,
) -> AppResult<impl axum::response::IntoResponse> {
    let row = PreferenceRepo::get(&state.pool, AppType::Hq.as_str(), member_id).await?;
    Ok(Json(DataResponse { data: row }))
}

/// PUT /push/preferences/{member_id} -- partial upsert.
async fn put_preference(
    State(state): State<AppState>,
    Path(member_id): Path<DbId>,
    Json(update): Json<UpdatePreference>,
) -> AppResult<impl axum::response::IntoResponse> {
    if let Some(days) = update.threshold_days {
        if days < 1 {
            return Err(CoreError::Validation("threshold_days must be at least 1".into()).into());
        }
    }
    let row = PreferenceRepo::upsert(&state.pool, AppType::Hq.as_str(), member_id, &update).await?;
    Ok(Json(DataResponse { data: row }))
}

/// Preference routes mounted at `/push/preferences`.
pub fn router() -> Router<AppState> {
    Router::new().route("/{member_id}", get(get_preference).put(put_preference))
}
