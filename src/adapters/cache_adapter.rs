//! Day-keyed on-disk cache around any data port.
//!
//! A fetch performed today is written to `<cache_dir>/<CODE>-<as_of>.csv`
//! and reused for the rest of the day; tomorrow's run re-queries the
//! inner port under a new key. Stale entries are never deleted, only
//! ignored. `as_of` is injected by the caller rather than read from
//! the clock, so cache behaviour is reproducible in tests.

use crate::adapters::csv_adapter::{parse_daily_csv, write_daily_csv};
use crate::domain::bar::DailyBar;
use crate::domain::error::SmacrossError;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::PathBuf;

pub struct CachingDataAdapter<P> {
    inner: P,
    cache_dir: PathBuf,
    as_of: NaiveDate,
}

impl<P: DataPort> CachingDataAdapter<P> {
    pub fn new(inner: P, cache_dir: PathBuf, as_of: NaiveDate) -> Self {
        Self {
            inner,
            cache_dir,
            as_of,
        }
    }

    fn cache_path(&self, code: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}-{}.csv", code, self.as_of.format("%Y-%m-%d")))
    }
}

impl<P: DataPort> DataPort for CachingDataAdapter<P> {
    fn fetch_daily(&self, code: &str) -> Result<Vec<DailyBar>, SmacrossError> {
        let path = self.cache_path(code);

        match fs::read_to_string(&path) {
            Ok(content) => return parse_daily_csv(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let bars = self.inner.fetch_daily(code)?;

        fs::create_dir_all(&self.cache_dir)?;
        fs::write(&path, write_daily_csv(&bars)?)?;

        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, SmacrossError> {
        self.inner.list_symbols()
    }

    fn data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SmacrossError> {
        self.inner.data_range(code)
    }
}
