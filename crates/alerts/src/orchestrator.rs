//! Scan → render → dispatch orchestration.
//!
//! Each rule pass fetches ranked candidates, then processes every candidate
//! independently: a render or dispatch failure is logged and skipped, never
//! aborting the rest of the batch. Only the scan phase itself propagates an
//! error. The returned count covers candidates that dispatched cleanly.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use toastlab_core::scanner::{format_quantity, ExpireSoonCandidate, StockLowCandidate};
use toastlab_core::suppression::{expire_soon_key, stock_low_key, SuppressionCache};
use toastlab_core::topic::HqTopic;
use toastlab_core::types::AppType;
use toastlab_push::dispatcher::{DispatchError, Dispatcher};
use toastlab_push::template::{TemplateRenderer, TEMPLATE_EXPIRE_SOON, TEMPLATE_STOCK_LOW};

use crate::scanner::InventoryScanner;

/// Deep link attached to inventory alerts.
const INVENTORY_LINK: &str = "/admin/inventory/list";

// ---------------------------------------------------------------------------
// Configuration and results
// ---------------------------------------------------------------------------

/// Tunables for the scan passes.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Hard cap on stock-low candidates per pass.
    pub stock_low_max: usize,
    /// Hard cap on expire-soon candidates per pass.
    pub expire_soon_max: usize,
    /// Expiration window in days; a lot expiring exactly this many days
    /// from now is still alerted.
    pub expire_soon_days: i64,
    /// Lifetime of the already-alerted marker.
    pub suppression_ttl: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            stock_low_max: 50,
            expire_soon_max: 50,
            expire_soon_days: 3,
            suppression_ttl: Duration::from_secs(1800),
        }
    }
}

/// Combined result of a full scan pass.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub stock_low: u32,
    pub expire_soon: u32,
}

/// Error type for scan-phase failures. Per-candidate dispatch failures are
/// swallowed by design and never appear here.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("Inventory scan failed: {0}")]
    Scan(#[from] sqlx::Error),
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Runs the scan-evaluate-notify pipeline for both alert rules.
pub struct AlertOrchestrator {
    scanner: Arc<dyn InventoryScanner>,
    dispatcher: Arc<Dispatcher>,
    renderer: TemplateRenderer,
    config: ScanConfig,
    suppression: Mutex<SuppressionCache>,
}

impl AlertOrchestrator {
    pub fn new(
        scanner: Arc<dyn InventoryScanner>,
        dispatcher: Arc<Dispatcher>,
        renderer: TemplateRenderer,
        config: ScanConfig,
    ) -> Self {
        let suppression = Mutex::new(SuppressionCache::new(config.suppression_ttl));
        Self {
            scanner,
            dispatcher,
            renderer,
            config,
            suppression,
        }
    }

    /// Scan for stock-low candidates and alert the stock-low topic.
    ///
    /// Returns the number of candidates that dispatched without error.
    pub async fn scan_and_notify_stock_low(&self) -> Result<u32, AlertError> {
        let candidates = self.scanner.find_stock_low(self.config.stock_low_max).await?;

        let mut sent = 0u32;
        for candidate in &candidates {
            let key = stock_low_key(candidate.material_id);
            if self.is_suppressed(&key) {
                tracing::debug!(material_id = candidate.material_id, "Stock-low alert suppressed");
                continue;
            }

            match self.notify_stock_low(candidate).await {
                Ok(_) => {
                    self.mark_alerted(&key);
                    sent += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        material_id = candidate.material_id,
                        error = %e,
                        "Stock-low alert failed"
                    );
                }
            }
        }

        tracing::info!(
            candidates = candidates.len(),
            sent,
            "Stock-low scan complete"
        );
        Ok(sent)
    }

    /// Scan for expiring lots and alert the expire-soon topic.
    ///
    /// Returns the number of candidates that dispatched without error.
    pub async fn scan_and_notify_expire_soon(&self) -> Result<u32, AlertError> {
        let days = self.config.expire_soon_days.max(1);
        let today = chrono::Utc::now().date_naive();

        let candidates = self
            .scanner
            .find_expire_soon(today, days, self.config.expire_soon_max)
            .await?;

        let mut sent = 0u32;
        for candidate in &candidates {
            let key = expire_soon_key(candidate.material_id, candidate.lot_code.as_deref());
            if self.is_suppressed(&key) {
                tracing::debug!(
                    material_id = candidate.material_id,
                    lot = candidate.lot_code.as_deref().unwrap_or("-"),
                    "Expire-soon alert suppressed"
                );
                continue;
            }

            match self.notify_expire_soon(candidate).await {
                Ok(_) => {
                    self.mark_alerted(&key);
                    sent += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        material_id = candidate.material_id,
                        error = %e,
                        "Expire-soon alert failed"
                    );
                }
            }
        }

        tracing::info!(
            candidates = candidates.len(),
            sent,
            "Expire-soon scan complete"
        );
        Ok(sent)
    }

    /// Run both rule passes and return the combined counts.
    pub async fn scan_all(&self) -> Result<ScanSummary, AlertError> {
        let stock_low = self.scan_and_notify_stock_low().await?;
        let expire_soon = self.scan_and_notify_expire_soon().await?;
        Ok(ScanSummary {
            stock_low,
            expire_soon,
        })
    }

    async fn notify_stock_low(&self, candidate: &StockLowCandidate) -> Result<String, DispatchError> {
        let vars = stock_low_vars(candidate);
        let title = self.renderer.render_title(TEMPLATE_STOCK_LOW, &vars).await?;
        let body = self.renderer.render_body(TEMPLATE_STOCK_LOW, &vars).await?;
        let data = stock_low_data(candidate);

        self.dispatcher
            .send_to_hq_topic(AppType::Hq, HqTopic::StockLow, &title, &body, &data)
            .await
    }

    async fn notify_expire_soon(
        &self,
        candidate: &ExpireSoonCandidate,
    ) -> Result<String, DispatchError> {
        let vars = expire_soon_vars(candidate);
        let title = self
            .renderer
            .render_title(TEMPLATE_EXPIRE_SOON, &vars)
            .await?;
        let body = self.renderer.render_body(TEMPLATE_EXPIRE_SOON, &vars).await?;
        let data = expire_soon_data(candidate);

        self.dispatcher
            .send_to_hq_topic(AppType::Hq, HqTopic::ExpireSoon, &title, &body, &data)
            .await
    }

    fn is_suppressed(&self, key: &str) -> bool {
        self.suppression
            .lock()
            .expect("suppression cache lock")
            .contains(key, chrono::Utc::now())
    }

    fn mark_alerted(&self, key: &str) {
        self.suppression
            .lock()
            .expect("suppression cache lock")
            .mark(key, chrono::Utc::now());
    }
}

// ---------------------------------------------------------------------------
// Payload builders
// ---------------------------------------------------------------------------

fn stock_low_vars(candidate: &StockLowCandidate) -> HashMap<String, String> {
    HashMap::from([
        ("materialName".to_string(), candidate.material_name.clone()),
        ("qty".to_string(), format_quantity(candidate.quantity)),
        ("threshold".to_string(), format_quantity(candidate.threshold)),
    ])
}

fn stock_low_data(candidate: &StockLowCandidate) -> HashMap<String, String> {
    HashMap::from([
        ("type".to_string(), TEMPLATE_STOCK_LOW.to_string()),
        ("materialName".to_string(), candidate.material_name.clone()),
        ("link".to_string(), INVENTORY_LINK.to_string()),
    ])
}

fn expire_soon_vars(candidate: &ExpireSoonCandidate) -> HashMap<String, String> {
    HashMap::from([
        ("materialName".to_string(), candidate.material_name.clone()),
        ("days".to_string(), candidate.days_left.to_string()),
        (
            "lot".to_string(),
            candidate.lot_code.clone().unwrap_or_else(|| "-".to_string()),
        ),
    ])
}

fn expire_soon_data(candidate: &ExpireSoonCandidate) -> HashMap<String, String> {
    let mut data = HashMap::from([
        ("type".to_string(), TEMPLATE_EXPIRE_SOON.to_string()),
        ("materialName".to_string(), candidate.material_name.clone()),
        ("days".to_string(), candidate.days_left.to_string()),
        ("link".to_string(), INVENTORY_LINK.to_string()),
    ]);
    if let Some(lot) = &candidate.lot_code {
        data.insert("lot".to_string(), lot.clone());
    }
    data
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use toastlab_push::dispatcher::WebPushSettings;
    use toastlab_db::DbPool;

    use super::*;

    /// Fixed candidate lists, no database behind them.
    struct FakeScanner {
        stock_low: Vec<StockLowCandidate>,
        expire_soon: Vec<ExpireSoonCandidate>,
    }

    #[async_trait]
    impl InventoryScanner for FakeScanner {
        async fn find_stock_low(
            &self,
            _max_rows: usize,
        ) -> Result<Vec<StockLowCandidate>, sqlx::Error> {
            Ok(self.stock_low.clone())
        }

        async fn find_expire_soon(
            &self,
            _today: NaiveDate,
            _days_threshold: i64,
            _max_rows: usize,
        ) -> Result<Vec<ExpireSoonCandidate>, sqlx::Error> {
            Ok(self.expire_soon.clone())
        }
    }

    fn unreachable_pool() -> DbPool {
        sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(100))
            .connect_lazy("postgres://nobody@127.0.0.1:1/alerts")
            .expect("lazy pool")
    }

    fn stock_candidate(id: i64) -> StockLowCandidate {
        StockLowCandidate {
            material_id: id,
            material_name: format!("material-{id}"),
            quantity: 5.0,
            threshold: 20.0,
        }
    }

    fn expire_candidate(id: i64, lot: Option<&str>) -> ExpireSoonCandidate {
        ExpireSoonCandidate {
            material_id: id,
            material_name: format!("material-{id}"),
            lot_code: lot.map(str::to_string),
            expiration_date: NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            days_left: 3,
        }
    }

    fn orchestrator(scanner: FakeScanner) -> AlertOrchestrator {
        let pool = unreachable_pool();
        // A disabled dispatcher: every candidate fails at the dispatch step.
        let dispatcher = Arc::new(Dispatcher::new(
            None,
            pool.clone(),
            true,
            WebPushSettings::default(),
        ));
        AlertOrchestrator::new(
            Arc::new(scanner),
            dispatcher,
            TemplateRenderer::new(pool),
            ScanConfig::default(),
        )
    }

    #[tokio::test]
    async fn all_candidates_failing_still_returns_a_count() {
        let orchestrator = orchestrator(FakeScanner {
            stock_low: vec![stock_candidate(1), stock_candidate(2)],
            expire_soon: vec![expire_candidate(1, Some("L-1"))],
        });

        // Every render/dispatch fails (no template store, no channel), but
        // the pass itself must not raise and the count reflects zero sends.
        let summary = orchestrator.scan_all().await.unwrap();
        assert_eq!(summary.stock_low, 0);
        assert_eq!(summary.expire_soon, 0);
    }

    #[tokio::test]
    async fn suppressed_candidates_are_skipped() {
        let orchestrator = orchestrator(FakeScanner {
            stock_low: vec![stock_candidate(7)],
            expire_soon: vec![],
        });

        orchestrator
            .suppression
            .lock()
            .unwrap()
            .mark(&stock_low_key(7), chrono::Utc::now());

        let sent = orchestrator.scan_and_notify_stock_low().await.unwrap();
        assert_eq!(sent, 0);
    }

    #[test]
    fn stock_low_payload_shapes() {
        let candidate = StockLowCandidate {
            material_id: 1,
            material_name: "Flour".into(),
            quantity: 5.0,
            threshold: 20.0,
        };

        let vars = stock_low_vars(&candidate);
        assert_eq!(vars["qty"], "5");
        assert_eq!(vars["threshold"], "20");

        let data = stock_low_data(&candidate);
        assert_eq!(data["type"], "HQ_STOCK_LOW");
        assert_eq!(data["link"], INVENTORY_LINK);
    }

    #[test]
    fn expire_soon_payload_shapes() {
        let with_lot = expire_candidate(1, Some("L-7"));
        let vars = expire_soon_vars(&with_lot);
        assert_eq!(vars["days"], "3");
        assert_eq!(vars["lot"], "L-7");
        assert_eq!(expire_soon_data(&with_lot)["lot"], "L-7");

        let without_lot = expire_candidate(2, None);
        assert_eq!(expire_soon_vars(&without_lot)["lot"], "-");
        assert!(!expire_soon_data(&without_lot).contains_key("lot"));
    }
}
