//! Read-only row snapshots for the inventory scanner.

use chrono::NaiveDate;
use sqlx::FromRow;
use toastlab_core::types::DbId;

/// One HQ inventory row joined with its material, as read by the scanner.
#[derive(Debug, Clone, FromRow)]
pub struct StockSnapshotRow {
    pub material_id: DbId,
    pub material_name: String,
    pub quantity: f64,
    pub inventory_optimal: Option<f64>,
    pub material_optimal: Option<f64>,
}

/// One HQ-owned lot row joined with its material, as read by the scanner.
#[derive(Debug, Clone, FromRow)]
pub struct LotSnapshotRow {
    pub material_id: DbId,
    pub material_name: String,
    pub lot_code: Option<String>,
    pub expiration_date: NaiveDate,
    pub quantity: f64,
}
