//! Trailing simple moving averages over closing prices.
//!
//! O(n) sliding window implementation.
//! SMA(n) = (P[i-n+1] + ... + P[i]) / n
//! Warmup: the first (n-1) values are `None`.

use crate::domain::bar::{DailyBar, SignalBar};

/// Simple moving average of `values` over `period`. The warmup prefix
/// is `None`; a zero period yields all `None`.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut window_sum: f64 = 0.0;

    for (i, &value) in values.iter().enumerate() {
        window_sum += value;
        if i >= period {
            window_sum -= values[i - period];
        }

        if i + 1 >= period {
            out.push(Some(window_sum / period as f64));
        } else {
            out.push(None);
        }
    }

    out
}

/// Attach fast/slow moving averages of close to each bar, producing the
/// series the strategy loop consumes.
pub fn with_moving_averages(
    bars: &[DailyBar],
    fast_window: usize,
    slow_window: usize,
) -> Vec<SignalBar> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let fast = sma(&closes, fast_window);
    let slow = sma(&closes, slow_window);

    bars.iter()
        .zip(fast)
        .zip(slow)
        .map(|((bar, fast_ma), slow_ma)| SignalBar {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            fast_ma,
            slow_ma,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(closes: &[f64]) -> Vec<DailyBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| DailyBar {
                date: NaiveDate::from_ymd_opt(2019, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn sma_warmup() {
        let values = sma(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);

        assert_eq!(values[0], None);
        assert_eq!(values[1], None);
        assert!(values[2].is_some());
        assert!(values[3].is_some());
        assert!(values[4].is_some());
    }

    #[test]
    fn sma_known_values() {
        let values = sma(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);

        assert!((values[2].unwrap() - 20.0).abs() < f64::EPSILON);
        assert!((values[3].unwrap() - 30.0).abs() < f64::EPSILON);
        assert!((values[4].unwrap() - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sma_period_1() {
        let values = sma(&[10.0, 20.0, 30.0], 1);

        assert!((values[0].unwrap() - 10.0).abs() < f64::EPSILON);
        assert!((values[1].unwrap() - 20.0).abs() < f64::EPSILON);
        assert!((values[2].unwrap() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sma_period_0() {
        let values = sma(&[10.0, 20.0], 0);
        assert_eq!(values, vec![None, None]);
    }

    #[test]
    fn sma_empty() {
        let values = sma(&[], 3);
        assert!(values.is_empty());
    }

    #[test]
    fn sma_equal_prices() {
        let values = sma(&[100.0, 100.0, 100.0, 100.0], 2);
        assert!((values[3].unwrap() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn with_moving_averages_warmup_boundaries() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let signal = with_moving_averages(&bars, 2, 4);

        assert_eq!(signal.len(), 5);
        assert_eq!(signal[0].fast_ma, None);
        assert!(signal[1].fast_ma.is_some());
        assert_eq!(signal[2].slow_ma, None);
        assert!(signal[3].slow_ma.is_some());
        assert_eq!(signal[1].averages(), None);
        assert!(signal[3].averages().is_some());
    }

    #[test]
    fn with_moving_averages_keeps_bar_fields() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let signal = with_moving_averages(&bars, 2, 3);

        assert_eq!(signal[1].date, bars[1].date);
        assert_eq!(signal[1].open, bars[1].open);
        assert_eq!(signal[1].low, bars[1].low);
        assert_eq!(signal[1].volume, bars[1].volume);
    }

    #[test]
    fn with_moving_averages_values() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        let signal = with_moving_averages(&bars, 2, 3);

        assert!((signal[3].fast_ma.unwrap() - 35.0).abs() < f64::EPSILON);
        assert!((signal[3].slow_ma.unwrap() - 30.0).abs() < f64::EPSILON);
    }
}
