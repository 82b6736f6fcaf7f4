//! Periodic background scan loop.
//!
//! Spawned from the binary when the scanner is enabled. Runs a full scan
//! pass on a fixed interval using `tokio::time::interval` and exits
//! gracefully when the [`CancellationToken`] fires. A failed pass is
//! logged and the loop keeps going.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::orchestrator::AlertOrchestrator;

/// Run the scan loop until cancelled.
pub async fn run_scan_loop(
    orchestrator: Arc<AlertOrchestrator>,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Inventory scan loop started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Inventory scan loop stopping");
                break;
            }
            _ = ticker.tick() => {
                match orchestrator.scan_all().await {
                    Ok(summary) => {
                        tracing::info!(
                            stock_low = summary.stock_low,
                            expire_soon = summary.expire_soon,
                            "Scheduled inventory scan complete"
                        );
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Scheduled inventory scan failed");
                    }
                }
            }
        }
    }
}
