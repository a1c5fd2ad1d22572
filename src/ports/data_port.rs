//! Price-series access port trait.

use crate::domain::bar::DailyBar;
use crate::domain::error::SmacrossError;
use chrono::NaiveDate;

/// Source of the daily price history for a single symbol. The core
/// treats the series as opaque: how it is fetched or cached is an
/// adapter concern.
pub trait DataPort {
    /// All daily bars for `code`, sorted ascending by date.
    fn fetch_daily(&self, code: &str) -> Result<Vec<DailyBar>, SmacrossError>;

    fn list_symbols(&self) -> Result<Vec<String>, SmacrossError>;

    /// First date, last date and bar count for `code`, or `None` when
    /// no data exists.
    fn data_range(&self, code: &str)
        -> Result<Option<(NaiveDate, NaiveDate, usize)>, SmacrossError>;
}
