//! Append-only transaction ledger.

use chrono::NaiveDate;

/// Snapshot of a position at a register-worthy event (open, stop-loss
/// raise, close). Field order matches the report column order.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub id: u32,
    pub open_date: Option<NaiveDate>,
    pub stocks_number: i64,
    pub open_price: f64,
    pub open_value: f64,
    pub open_commission: f64,
    pub open_total: f64,
    pub stop_loss_date: Option<NaiveDate>,
    pub stop_loss_price: f64,
    pub close_date: Option<NaiveDate>,
    pub close_price: f64,
    pub close_value: f64,
    pub close_commission: f64,
    pub close_total: f64,
    pub result: f64,
}

/// Ordered record of position snapshots. Grows monotonically; rows are
/// never mutated in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    rows: Vec<LedgerRow>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger { rows: Vec::new() }
    }

    pub fn append(&mut self, row: LedgerRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[LedgerRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows where a close occurred, one per completed round trip.
    pub fn closed_rows(&self) -> impl Iterator<Item = &LedgerRow> {
        self.rows.iter().filter(|row| row.close_date.is_some())
    }

    /// Sum of `result` over close rows: the total strategy P&L.
    pub fn total_result(&self) -> f64 {
        self.closed_rows().map(|row| row.result).sum()
    }
}
