//! Daily price bar representations.

use chrono::NaiveDate;

/// One day's raw price/volume record as supplied by a data source.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// A daily bar enriched with the two trailing moving averages the
/// strategy compares. Each average is `None` until enough history
/// exists to fill its window.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub fast_ma: Option<f64>,
    pub slow_ma: Option<f64>,
}

impl SignalBar {
    /// Both averages, when the bar can drive entry/exit decisions.
    pub fn averages(&self) -> Option<(f64, f64)> {
        match (self.fast_ma, self.slow_ma) {
            (Some(fast), Some(slow)) => Some((fast, slow)),
            _ => None,
        }
    }
}
