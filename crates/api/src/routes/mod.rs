pub mod health;
pub mod logs;
pub mod preferences;
pub mod scan;
pub mod send;
pub mod subscriptions;
pub mod tokens;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /push/scan/run                      run both rules (POST)
/// /push/scan/stock-low                run stock-low rule (POST)
/// /push/scan/expire-soon              run expire-soon rule (POST)
///
/// /push/logs                          recent send logs (GET)
///
/// /push/tokens                        register/upsert a device token (POST)
/// /push/tokens/{token}                deactivate a device token (DELETE)
///
/// /push/preferences/{member_id}       get (GET), partial upsert (PUT)
///
/// /push/topics/{topic}/subscribe      subscribe member tokens (POST)
/// /push/topics/{topic}/unsubscribe    unsubscribe member tokens (POST)
///
/// /push/send/test                     test send to topic or token (POST)
/// /push/templates/preview             render a template (POST)
/// /push/reminder                      morning reminder to hq-all (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/push/scan", scan::router())
        .nest("/push/logs", logs::router())
        .nest("/push/tokens", tokens::router())
        .nest("/push/preferences", preferences::router())
        .nest("/push/topics", subscriptions::router())
        .merge(send::router())
}
