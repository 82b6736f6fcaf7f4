use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use toastlab_alerts::{scheduler, AlertOrchestrator, SqlInventoryScanner};
use toastlab_api::config::ServerConfig;
use toastlab_api::{router, state::AppState};
use toastlab_push::template::seed_default_templates;
use toastlab_push::{
    Dispatcher, HttpPushGateway, PushProvider, SubscriptionManager, TemplateRenderer,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "toastlab_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = toastlab_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    toastlab_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    toastlab_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Default templates ---
    if config.push.seed_templates {
        seed_default_templates(&pool)
            .await
            .expect("Failed to seed default push templates");
    }

    // --- Push delivery channel ---
    let provider: Option<Arc<dyn PushProvider>> = match &config.push.gateway_url {
        Some(url) => {
            tracing::info!(gateway = %url, "Push gateway configured");
            Some(Arc::new(HttpPushGateway::new(
                url.clone(),
                config.push.gateway_key.clone(),
            )))
        }
        None => {
            tracing::warn!("No push gateway configured; sends will fail with ChannelDisabled");
            None
        }
    };

    let dispatcher = Arc::new(Dispatcher::new(
        provider.clone(),
        pool.clone(),
        config.push.topic_restrict,
        config.push.webpush.clone(),
    ));
    let subscriptions = Arc::new(SubscriptionManager::new(
        provider,
        pool.clone(),
        config.push.topic_restrict,
    ));
    let renderer = Arc::new(TemplateRenderer::new(pool.clone()));

    // --- Scan pipeline ---
    let scanner = Arc::new(SqlInventoryScanner::new(pool.clone()));
    let orchestrator = Arc::new(AlertOrchestrator::new(
        scanner,
        Arc::clone(&dispatcher),
        TemplateRenderer::new(pool.clone()),
        config.scanner.scan_config(),
    ));

    let scan_cancel = CancellationToken::new();
    if config.scanner.enabled {
        tokio::spawn(scheduler::run_scan_loop(
            Arc::clone(&orchestrator),
            Duration::from_secs(config.scanner.interval_secs),
            scan_cancel.clone(),
        ));
    } else {
        tracing::info!("Inventory scan loop disabled");
    }

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        dispatcher,
        subscriptions,
        renderer,
        orchestrator,
    };

    // --- Router ---
    let app = router::build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(scan_cancel))
        .await
        .expect("Server failed");
}

/// Resolve on Ctrl-C / SIGTERM, stopping background loops first.
async fn shutdown_signal(scan_cancel: CancellationToken) {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl-C handler");
    tracing::info!("Shutdown signal received");
    scan_cancel.cancel();
}
