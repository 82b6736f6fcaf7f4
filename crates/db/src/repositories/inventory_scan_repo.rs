//! Read-only queries over the inventory backing store for the HQ scanner.
//!
//! The queries pre-filter to rows the rules could possibly match (in-use
//! materials, HQ-owned lots, the date window); the rule predicates and the
//! severity ordering live in `toastlab_core::scanner`.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::inventory::{LotSnapshotRow, StockSnapshotRow};

/// Provides snapshot reads for the stock-low and expire-soon rules.
pub struct InventoryScanRepo;

impl InventoryScanRepo {
    /// All HQ inventory rows for in-use materials, with both threshold
    /// sources.
    pub async fn stock_levels(pool: &PgPool) -> Result<Vec<StockSnapshotRow>, sqlx::Error> {
        sqlx::query_as::<_, StockSnapshotRow>(
            "SELECT m.id AS material_id, \
                    m.name AS material_name, \
                    inv.quantity AS quantity, \
                    inv.optimal_quantity AS inventory_optimal, \
                    m.optimal_quantity AS material_optimal \
             FROM hq_inventory inv \
             JOIN materials m ON m.id = inv.material_id \
             WHERE m.is_active = true",
        )
        .fetch_all(pool)
        .await
    }

    /// Non-empty HQ-owned lots of in-use materials expiring in
    /// `[start, end_exclusive)`.
    pub async fn hq_lots_in_window(
        pool: &PgPool,
        start: NaiveDate,
        end_exclusive: NaiveDate,
    ) -> Result<Vec<LotSnapshotRow>, sqlx::Error> {
        sqlx::query_as::<_, LotSnapshotRow>(
            "SELECT m.id AS material_id, \
                    m.name AS material_name, \
                    l.lot_code AS lot_code, \
                    l.expiration_date AS expiration_date, \
                    l.quantity AS quantity \
             FROM inventory_lots l \
             JOIN materials m ON m.id = l.material_id \
             WHERE m.is_active = true \
               AND l.store_id IS NULL \
               AND l.quantity > 0 \
               AND l.expiration_date >= $1 \
               AND l.expiration_date < $2",
        )
        .bind(start)
        .bind(end_exclusive)
        .fetch_all(pool)
        .await
    }
}
