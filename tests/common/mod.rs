#![allow(dead_code)]

use chrono::NaiveDate;
use smacross::domain::bar::{DailyBar, SignalBar};
use smacross::domain::error::SmacrossError;
use smacross::domain::simulation::SimulationParams;
use smacross::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<DailyBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<DailyBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_daily(&self, code: &str) -> Result<Vec<DailyBar>, SmacrossError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(SmacrossError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(code) {
            Some(bars) => Ok(bars.clone()),
            None => Err(SmacrossError::NoData {
                code: code.to_string(),
            }),
        }
    }

    fn list_symbols(&self) -> Result<Vec<String>, SmacrossError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SmacrossError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(SmacrossError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(code) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date_str: &str, close: f64) -> DailyBar {
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap();
    DailyBar {
        date,
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

pub fn make_ohlc_bar(date_str: &str, open: f64, high: f64, low: f64, close: f64) -> DailyBar {
    DailyBar {
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        open,
        high,
        low,
        close,
        volume: 1000,
    }
}

pub fn make_signal_bar(
    date_str: &str,
    open: f64,
    low: f64,
    close: f64,
    fast_ma: Option<f64>,
    slow_ma: Option<f64>,
) -> SignalBar {
    SignalBar {
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        open,
        high: open.max(close),
        low,
        close,
        volume: 1000,
        fast_ma,
        slow_ma,
    }
}

pub fn generate_bars(start_date: &str, count: usize, start_price: f64) -> Vec<DailyBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| DailyBar {
            date: start + chrono::Duration::days(i as i64),
            open: start_price + i as f64,
            high: start_price + i as f64 + 1.0,
            low: start_price + i as f64 - 1.0,
            close: start_price + i as f64,
            volume: 1000,
        })
        .collect()
}

pub fn default_params() -> SimulationParams {
    SimulationParams::default()
}
