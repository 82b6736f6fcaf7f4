use std::sync::Arc;

use toastlab_alerts::AlertOrchestrator;
use toastlab_push::{Dispatcher, SubscriptionManager, TemplateRenderer};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: toastlab_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Notification dispatcher (validation, envelope, provider, audit).
    pub dispatcher: Arc<Dispatcher>,
    /// Topic subscription manager.
    pub subscriptions: Arc<SubscriptionManager>,
    /// DB-backed template renderer (preview endpoint).
    pub renderer: Arc<TemplateRenderer>,
    /// Scan pipeline orchestrator (manual triggers + scheduler).
    pub orchestrator: Arc<AlertOrchestrator>,
}
