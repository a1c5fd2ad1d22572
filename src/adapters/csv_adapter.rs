//! CSV file data adapter.
//!
//! Reads `<directory>/<CODE>.csv` with the header
//! `date,open,high,low,close,volume`. Malformed rows are fatal: the
//! strategy cannot make a safe decision on partial bar data.

use crate::domain::bar::DailyBar;
use crate::domain::error::SmacrossError;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::PathBuf;

pub struct CsvDataAdapter {
    base_path: PathBuf,
}

impl CsvDataAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", code))
    }
}

/// Parse daily bars out of CSV text. Shared with the caching adapter,
/// which stores its entries in the same format.
pub(crate) fn parse_daily_csv(content: &str) -> Result<Vec<DailyBar>, SmacrossError> {
    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let mut bars = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| SmacrossError::Data {
            reason: format!("CSV parse error: {}", e),
        })?;

        let date_str = record.get(0).ok_or_else(|| SmacrossError::Data {
            reason: "missing date column".into(),
        })?;
        let date =
            NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| SmacrossError::Data {
                reason: format!("invalid date format: {}", e),
            })?;

        let open: f64 = record
            .get(1)
            .ok_or_else(|| SmacrossError::Data {
                reason: "missing open column".into(),
            })?
            .parse()
            .map_err(|e| SmacrossError::Data {
                reason: format!("invalid open value: {}", e),
            })?;

        let high: f64 = record
            .get(2)
            .ok_or_else(|| SmacrossError::Data {
                reason: "missing high column".into(),
            })?
            .parse()
            .map_err(|e| SmacrossError::Data {
                reason: format!("invalid high value: {}", e),
            })?;

        let low: f64 = record
            .get(3)
            .ok_or_else(|| SmacrossError::Data {
                reason: "missing low column".into(),
            })?
            .parse()
            .map_err(|e| SmacrossError::Data {
                reason: format!("invalid low value: {}", e),
            })?;

        let close: f64 = record
            .get(4)
            .ok_or_else(|| SmacrossError::Data {
                reason: "missing close column".into(),
            })?
            .parse()
            .map_err(|e| SmacrossError::Data {
                reason: format!("invalid close value: {}", e),
            })?;

        let volume: i64 = record
            .get(5)
            .ok_or_else(|| SmacrossError::Data {
                reason: "missing volume column".into(),
            })?
            .parse()
            .map_err(|e| SmacrossError::Data {
                reason: format!("invalid volume value: {}", e),
            })?;

        bars.push(DailyBar {
            date,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

/// Render bars back into the same CSV format `parse_daily_csv` reads.
pub(crate) fn write_daily_csv(bars: &[DailyBar]) -> Result<String, SmacrossError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["date", "open", "high", "low", "close", "volume"])
        .map_err(io::Error::other)?;

    for bar in bars {
        wtr.write_record([
            bar.date.format("%Y-%m-%d").to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ])
        .map_err(io::Error::other)?;
    }

    let buf = wtr.into_inner().map_err(|e| io::Error::other(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| SmacrossError::Data {
        reason: format!("non-UTF8 CSV output: {}", e),
    })
}

impl DataPort for CsvDataAdapter {
    fn fetch_daily(&self, code: &str) -> Result<Vec<DailyBar>, SmacrossError> {
        let path = self.csv_path(code);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SmacrossError::NoData {
                    code: code.to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        parse_daily_csv(&content)
    }

    fn list_symbols(&self) -> Result<Vec<String>, SmacrossError> {
        let entries = fs::read_dir(&self.base_path)?;

        let mut symbols = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            let name_str = name.to_string_lossy();

            if let Some(code) = name_str.strip_suffix(".csv") {
                symbols.push(code.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SmacrossError> {
        let bars = match self.fetch_daily(code) {
            Ok(bars) => bars,
            Err(SmacrossError::NoData { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        // Already sorted ascending.
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        // Rows deliberately out of order; the adapter sorts.
        let csv_content = "date,open,high,low,close,volume\n\
            2019-07-11,105.0,115.0,100.0,110.0,60000\n\
            2019-07-10,100.0,110.0,90.0,105.0,50000\n\
            2019-07-12,110.0,120.0,105.0,115.0,55000\n";

        fs::write(path.join("AMC.csv"), csv_content).unwrap();
        fs::write(path.join("PKO.csv"), "date,open,high,low,close,volume\n").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_daily_returns_sorted_bars() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvDataAdapter::new(path);

        let bars = adapter.fetch_daily("AMC").unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2019, 7, 10).unwrap());
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50000);
        assert_eq!(bars[2].date, NaiveDate::from_ymd_opt(2019, 7, 12).unwrap());
    }

    #[test]
    fn fetch_daily_missing_file_is_no_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvDataAdapter::new(path);

        let err = adapter.fetch_daily("XYZ").unwrap_err();
        assert!(matches!(err, SmacrossError::NoData { code } if code == "XYZ"));
    }

    #[test]
    fn fetch_daily_rejects_malformed_number() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join("BAD.csv"),
            "date,open,high,low,close,volume\n2019-07-10,abc,110.0,90.0,105.0,50000\n",
        )
        .unwrap();
        let adapter = CsvDataAdapter::new(path);

        let err = adapter.fetch_daily("BAD").unwrap_err();
        assert!(matches!(err, SmacrossError::Data { .. }));
    }

    #[test]
    fn fetch_daily_rejects_malformed_date() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join("BAD.csv"),
            "date,open,high,low,close,volume\n10/07/2019,100.0,110.0,90.0,105.0,50000\n",
        )
        .unwrap();
        let adapter = CsvDataAdapter::new(path);

        let err = adapter.fetch_daily("BAD").unwrap_err();
        assert!(matches!(err, SmacrossError::Data { .. }));
    }

    #[test]
    fn fetch_daily_rejects_missing_column() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join("BAD.csv"),
            "date,open,high,low,close\n2019-07-10,100.0,110.0,90.0,105.0\n",
        )
        .unwrap();
        let adapter = CsvDataAdapter::new(path);

        let err = adapter.fetch_daily("BAD").unwrap_err();
        assert!(matches!(err, SmacrossError::Data { .. }));
    }

    #[test]
    fn list_symbols_returns_codes() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvDataAdapter::new(path);

        let symbols = adapter.list_symbols().unwrap();
        assert_eq!(symbols, vec!["AMC", "PKO"]);
    }

    #[test]
    fn data_range_reports_bounds_and_count() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvDataAdapter::new(path);

        let range = adapter.data_range("AMC").unwrap().unwrap();
        assert_eq!(range.0, NaiveDate::from_ymd_opt(2019, 7, 10).unwrap());
        assert_eq!(range.1, NaiveDate::from_ymd_opt(2019, 7, 12).unwrap());
        assert_eq!(range.2, 3);
    }

    #[test]
    fn data_range_none_for_missing_or_empty() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvDataAdapter::new(path);

        assert_eq!(adapter.data_range("XYZ").unwrap(), None);
        assert_eq!(adapter.data_range("PKO").unwrap(), None);
    }

    #[test]
    fn write_then_parse_round_trips() {
        let bars = vec![DailyBar {
            date: NaiveDate::from_ymd_opt(2019, 7, 10).unwrap(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.5,
            volume: 50000,
        }];

        let content = write_daily_csv(&bars).unwrap();
        let parsed = parse_daily_csv(&content).unwrap();
        assert_eq!(parsed, bars);
    }
}
