//! Inventory scanning behind a seam.
//!
//! [`SqlInventoryScanner`] reads row snapshots through the db crate and
//! ranks them with the pure rule logic in `toastlab_core::scanner`.
//! [`NoopInventoryScanner`] is the valid substitute when the backing store
//! is absent or the feature is disabled: it returns empty lists instead of
//! failing.

use async_trait::async_trait;
use chrono::NaiveDate;
use toastlab_core::scanner::{
    rank_expire_soon, rank_stock_low, ExpireSoonCandidate, LotRow, StockLevelRow,
    StockLowCandidate,
};
use toastlab_db::repositories::InventoryScanRepo;
use toastlab_db::DbPool;

/// Read-only candidate source for the two alert rules.
#[async_trait]
pub trait InventoryScanner: Send + Sync {
    /// Ranked stock-low candidates, capped at `max_rows`.
    async fn find_stock_low(&self, max_rows: usize)
        -> Result<Vec<StockLowCandidate>, sqlx::Error>;

    /// Ranked expire-soon candidates within `[today, today + days + 1)`,
    /// capped at `max_rows`.
    async fn find_expire_soon(
        &self,
        today: NaiveDate,
        days_threshold: i64,
        max_rows: usize,
    ) -> Result<Vec<ExpireSoonCandidate>, sqlx::Error>;
}

/// Scanner over the relational inventory store.
pub struct SqlInventoryScanner {
    pool: DbPool,
}

impl SqlInventoryScanner {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryScanner for SqlInventoryScanner {
    async fn find_stock_low(
        &self,
        max_rows: usize,
    ) -> Result<Vec<StockLowCandidate>, sqlx::Error> {
        let rows = InventoryScanRepo::stock_levels(&self.pool).await?;
        let rows: Vec<StockLevelRow> = rows
            .into_iter()
            .map(|row| StockLevelRow {
                material_id: row.material_id,
                material_name: row.material_name,
                quantity: row.quantity,
                inventory_optimal: row.inventory_optimal,
                material_optimal: row.material_optimal,
            })
            .collect();
        Ok(rank_stock_low(rows, max_rows))
    }

    async fn find_expire_soon(
        &self,
        today: NaiveDate,
        days_threshold: i64,
        max_rows: usize,
    ) -> Result<Vec<ExpireSoonCandidate>, sqlx::Error> {
        let end_exclusive = today + chrono::Duration::days(days_threshold + 1);
        let rows = InventoryScanRepo::hq_lots_in_window(&self.pool, today, end_exclusive).await?;
        let rows: Vec<LotRow> = rows
            .into_iter()
            .map(|row| LotRow {
                material_id: row.material_id,
                material_name: row.material_name,
                lot_code: row.lot_code,
                expiration_date: row.expiration_date,
                quantity: row.quantity,
            })
            .collect();
        Ok(rank_expire_soon(rows, today, days_threshold, max_rows))
    }
}

/// Scanner used when no backing store is wired up.
pub struct NoopInventoryScanner;

#[async_trait]
impl InventoryScanner for NoopInventoryScanner {
    async fn find_stock_low(
        &self,
        max_rows: usize,
    ) -> Result<Vec<StockLowCandidate>, sqlx::Error> {
        tracing::debug!(max_rows, "No-op scanner: find_stock_low");
        Ok(Vec::new())
    }

    async fn find_expire_soon(
        &self,
        today: NaiveDate,
        days_threshold: i64,
        max_rows: usize,
    ) -> Result<Vec<ExpireSoonCandidate>, sqlx::Error> {
        tracing::debug!(%today, days_threshold, max_rows, "No-op scanner: find_expire_soon");
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_scanner_returns_empty_lists() {
        let scanner = NoopInventoryScanner;
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();

        assert!(scanner.find_stock_low(50).await.unwrap().is_empty());
        assert!(scanner
            .find_expire_soon(today, 3, 50)
            .await
            .unwrap()
            .is_empty());
    }
}
