//! Candidate ranking for the HQ inventory scan rules.
//!
//! The persistence layer hands over plain row snapshots; the functions here
//! apply the rule predicates, order candidates by severity, and cap the
//! result. No side effects.

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Row snapshots (scanner input)
// ---------------------------------------------------------------------------

/// One HQ inventory row joined with its material master data.
#[derive(Debug, Clone)]
pub struct StockLevelRow {
    pub material_id: DbId,
    pub material_name: String,
    /// Current HQ stock quantity.
    pub quantity: f64,
    /// Inventory-specific optimal quantity, when maintained.
    pub inventory_optimal: Option<f64>,
    /// Material-master default optimal quantity.
    pub material_optimal: Option<f64>,
}

/// One HQ-owned lot row joined with its material master data.
#[derive(Debug, Clone)]
pub struct LotRow {
    pub material_id: DbId,
    pub material_name: String,
    pub lot_code: Option<String>,
    pub expiration_date: NaiveDate,
    pub quantity: f64,
}

// ---------------------------------------------------------------------------
// Candidates (scanner output, never persisted)
// ---------------------------------------------------------------------------

/// An inventory item currently below its replenishment threshold.
#[derive(Debug, Clone, Serialize)]
pub struct StockLowCandidate {
    pub material_id: DbId,
    pub material_name: String,
    pub quantity: f64,
    /// The effective threshold the quantity was compared against.
    pub threshold: f64,
}

/// A lot whose shelf life ends within the configured window.
#[derive(Debug, Clone, Serialize)]
pub struct ExpireSoonCandidate {
    pub material_id: DbId,
    pub material_name: String,
    pub lot_code: Option<String>,
    pub expiration_date: NaiveDate,
    /// Whole days until expiration; today counts as 0.
    pub days_left: i64,
}

// ---------------------------------------------------------------------------
// Stock-low rule
// ---------------------------------------------------------------------------

/// Resolve the effective threshold for a stock row.
///
/// The inventory-specific optimal quantity wins over the material default.
/// Rows where neither is set, or where the resolved value is not a positive
/// number, have no derivable threshold and are excluded from the rule.
fn effective_threshold(row: &StockLevelRow) -> Option<f64> {
    row.inventory_optimal
        .or(row.material_optimal)
        .filter(|t| *t > 0.0)
}

/// Rank stock rows into low-stock candidates.
///
/// A row is a candidate iff `quantity < effective_threshold`. Candidates are
/// ordered most-deficient first: `quantity / threshold` ascending, ties by
/// absolute quantity ascending. `max_rows` caps the result after ordering
/// (minimum 1).
pub fn rank_stock_low(rows: Vec<StockLevelRow>, max_rows: usize) -> Vec<StockLowCandidate> {
    let mut candidates: Vec<StockLowCandidate> = rows
        .into_iter()
        .filter_map(|row| {
            let threshold = effective_threshold(&row)?;
            if row.quantity < threshold {
                Some(StockLowCandidate {
                    material_id: row.material_id,
                    material_name: row.material_name,
                    quantity: row.quantity,
                    threshold,
                })
            } else {
                None
            }
        })
        .collect();

    candidates.sort_by(|a, b| {
        let ratio_a = a.quantity / a.threshold;
        let ratio_b = b.quantity / b.threshold;
        ratio_a
            .total_cmp(&ratio_b)
            .then(a.quantity.total_cmp(&b.quantity))
    });

    candidates.truncate(max_rows.max(1));
    candidates
}

// ---------------------------------------------------------------------------
// Expire-soon rule
// ---------------------------------------------------------------------------

/// Rank lot rows into expire-soon candidates.
///
/// A lot is a candidate iff `quantity > 0` and its expiration date falls in
/// the half-open window `[today, today + days_threshold + 1)` — a lot
/// expiring exactly `days_threshold` days from now is included, one day
/// further is not. Candidates are ordered most-urgent first: `days_left`
/// ascending, ties by expiration date ascending. `max_rows` caps the result
/// after ordering (minimum 1).
pub fn rank_expire_soon(
    rows: Vec<LotRow>,
    today: NaiveDate,
    days_threshold: i64,
    max_rows: usize,
) -> Vec<ExpireSoonCandidate> {
    let end_exclusive = today + chrono::Duration::days(days_threshold + 1);

    let mut candidates: Vec<ExpireSoonCandidate> = rows
        .into_iter()
        .filter(|row| {
            row.quantity > 0.0 && row.expiration_date >= today && row.expiration_date < end_exclusive
        })
        .map(|row| {
            let days_left = (row.expiration_date - today).num_days();
            ExpireSoonCandidate {
                material_id: row.material_id,
                material_name: row.material_name,
                lot_code: row.lot_code,
                expiration_date: row.expiration_date,
                days_left,
            }
        })
        .collect();

    candidates.sort_by(|a, b| {
        a.days_left
            .cmp(&b.days_left)
            .then(a.expiration_date.cmp(&b.expiration_date))
    });

    candidates.truncate(max_rows.max(1));
    candidates
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Format a quantity for template variables: whole numbers without the
/// trailing `.0`, fractional values as-is.
pub fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{}", quantity as i64)
    } else {
        format!("{quantity}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock_row(
        id: DbId,
        qty: f64,
        inventory_optimal: Option<f64>,
        material_optimal: Option<f64>,
    ) -> StockLevelRow {
        StockLevelRow {
            material_id: id,
            material_name: format!("material-{id}"),
            quantity: qty,
            inventory_optimal,
            material_optimal,
        }
    }

    fn lot_row(id: DbId, lot: &str, expires: NaiveDate, qty: f64) -> LotRow {
        LotRow {
            material_id: id,
            material_name: format!("material-{id}"),
            lot_code: Some(lot.to_string()),
            expiration_date: expires,
            quantity: qty,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // -- stock-low rule ------------------------------------------------------

    #[test]
    fn inventory_override_wins_over_material_default() {
        // qty 5 vs inventory-specific optimal 20 -> candidate, ratio 0.25.
        let out = rank_stock_low(vec![stock_row(1, 5.0, Some(20.0), Some(100.0))], 10);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].threshold, 20.0);
    }

    #[test]
    fn material_default_applies_when_no_override() {
        // qty 30 vs material default 10 -> 30 >= 10, not a candidate.
        let out = rank_stock_low(vec![stock_row(1, 30.0, None, Some(10.0))], 10);
        assert!(out.is_empty());

        let out = rank_stock_low(vec![stock_row(1, 4.0, None, Some(10.0))], 10);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].threshold, 10.0);
    }

    #[test]
    fn no_threshold_means_no_candidate() {
        let out = rank_stock_low(vec![stock_row(1, 0.0, None, None)], 10);
        assert!(out.is_empty());
    }

    #[test]
    fn zero_threshold_is_not_derivable() {
        // A zero optimal quantity must not produce a division by zero or a
        // false positive.
        let out = rank_stock_low(vec![stock_row(1, 0.0, Some(0.0), None)], 10);
        assert!(out.is_empty());
    }

    #[test]
    fn candidate_iff_quantity_below_threshold() {
        let rows = vec![
            stock_row(1, 9.9, Some(10.0), None),
            stock_row(2, 10.0, Some(10.0), None),
            stock_row(3, 10.1, Some(10.0), None),
        ];
        let out = rank_stock_low(rows, 10);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].material_id, 1);
    }

    #[test]
    fn ordered_by_deficiency_ratio_then_quantity() {
        let rows = vec![
            stock_row(1, 5.0, Some(10.0), None),  // ratio 0.5
            stock_row(2, 1.0, Some(10.0), None),  // ratio 0.1
            stock_row(3, 10.0, Some(40.0), None), // ratio 0.25
            stock_row(4, 2.5, Some(10.0), None),  // ratio 0.25, smaller qty
        ];
        let out = rank_stock_low(rows, 10);
        let ids: Vec<DbId> = out.iter().map(|c| c.material_id).collect();
        assert_eq!(ids, vec![2, 4, 3, 1]);
    }

    #[test]
    fn cap_applies_after_ordering_with_minimum_one() {
        let rows = vec![
            stock_row(1, 5.0, Some(10.0), None),
            stock_row(2, 1.0, Some(10.0), None),
        ];
        let out = rank_stock_low(rows.clone(), 1);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].material_id, 2);

        // A zero cap is treated as 1, never as "drop everything".
        let out = rank_stock_low(rows, 0);
        assert_eq!(out.len(), 1);
    }

    // -- expire-soon rule ----------------------------------------------------

    #[test]
    fn window_is_half_open() {
        let today = date(2026, 8, 7);
        let rows = vec![
            lot_row(1, "L-0", date(2026, 8, 7), 1.0),  // today: included
            lot_row(2, "L-3", date(2026, 8, 10), 1.0), // exactly N days: included
            lot_row(3, "L-4", date(2026, 8, 11), 1.0), // N+1 days: excluded
            lot_row(4, "L-P", date(2026, 8, 6), 1.0),  // already expired: excluded
        ];
        let out = rank_expire_soon(rows, today, 3, 10);
        let ids: Vec<DbId> = out.iter().map(|c| c.material_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(out[0].days_left, 0);
        assert_eq!(out[1].days_left, 3);
    }

    #[test]
    fn empty_lots_are_ignored() {
        let today = date(2026, 8, 7);
        let out = rank_expire_soon(vec![lot_row(1, "L-1", date(2026, 8, 8), 0.0)], today, 3, 10);
        assert!(out.is_empty());
    }

    #[test]
    fn ordered_by_days_left_then_expiration_date() {
        let today = date(2026, 8, 7);
        let rows = vec![
            lot_row(1, "L-2", date(2026, 8, 9), 1.0),
            lot_row(2, "L-0", date(2026, 8, 7), 1.0),
            lot_row(3, "L-1", date(2026, 8, 8), 1.0),
        ];
        let out = rank_expire_soon(rows, today, 3, 10);
        let ids: Vec<DbId> = out.iter().map(|c| c.material_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn expire_cap_applies_after_ordering() {
        let today = date(2026, 8, 7);
        let rows = vec![
            lot_row(1, "L-2", date(2026, 8, 9), 1.0),
            lot_row(2, "L-0", date(2026, 8, 7), 1.0),
        ];
        let out = rank_expire_soon(rows, today, 3, 1);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].material_id, 2);
    }

    // -- formatting ----------------------------------------------------------

    #[test]
    fn quantities_format_without_trailing_zero() {
        assert_eq!(format_quantity(5.0), "5");
        assert_eq!(format_quantity(2.5), "2.5");
        assert_eq!(format_quantity(0.0), "0");
    }
}
