//! Trade lifecycle state machine: sizing, commission legs, trailing stop.

use chrono::NaiveDate;

use super::condition::Condition;
use super::ledger::{Ledger, LedgerRow};

/// Lifecycle state. At most one position is open at a time. `Flat`
/// also covers a just-closed position awaiting [`Position::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionStatus {
    Flat,
    Open,
}

/// Trailing stop strategies. A closed set: unrecognized config text
/// never reaches the loop as a mode value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopLossMode {
    /// Trail the stop a fixed percentage below price.
    Percent,
    /// Accepted but performs no adjustment yet; extension point.
    Atr,
}

impl StopLossMode {
    pub fn parse(text: &str) -> Option<StopLossMode> {
        match text.trim().to_lowercase().as_str() {
            "percent" => Some(StopLossMode::Percent),
            "atr" => Some(StopLossMode::Atr),
            _ => None,
        }
    }
}

/// One trade lifecycle. Monetary fields are derived on `open`/`close`
/// and stay readable after a close until [`Position::reset`] clears
/// them and advances the id for the next trade.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub id: u32,
    pub status: PositionStatus,
    pub stocks_number: i64,
    pub open_price: f64,
    pub open_date: Option<NaiveDate>,
    pub open_value: f64,
    pub open_commission: f64,
    pub open_total: f64,
    pub stop_loss_price: f64,
    pub stop_loss_date: Option<NaiveDate>,
    pub close_price: f64,
    pub close_date: Option<NaiveDate>,
    pub close_value: f64,
    pub close_commission: f64,
    pub close_total: f64,
    pub result: f64,
    commission_rate: f64,
    minimum_commission: f64,
}

impl Position {
    pub fn new(id: u32, commission_rate: f64, minimum_commission: f64) -> Self {
        Position {
            id,
            status: PositionStatus::Flat,
            stocks_number: 0,
            open_price: 0.0,
            open_date: None,
            open_value: 0.0,
            open_commission: 0.0,
            open_total: 0.0,
            stop_loss_price: 0.0,
            stop_loss_date: None,
            close_price: 0.0,
            close_date: None,
            close_value: 0.0,
            close_commission: 0.0,
            close_total: 0.0,
            result: 0.0,
            commission_rate,
            minimum_commission,
        }
    }

    /// Broker commission for one leg: value × rate, floored at the
    /// minimum. The floor applies to each leg independently.
    fn commission_for(&self, value: f64) -> f64 {
        (value * self.commission_rate).max(self.minimum_commission)
    }

    /// How many whole shares `available_cash` buys at `price` once the
    /// proportional commission is set aside. Pure, no state change.
    pub fn size_for(&self, price: f64, available_cash: f64) -> i64 {
        if price <= 0.0 {
            return 0;
        }
        ((available_cash - available_cash * self.commission_rate) / price).floor() as i64
    }

    /// Buy `number` shares at `price`. No-op unless flat; opening on
    /// top of an open position must not overwrite it.
    pub fn open(&mut self, number: i64, price: f64, date: NaiveDate, ledger: &mut Ledger) {
        if self.status != PositionStatus::Flat {
            return;
        }

        self.stocks_number = number;
        self.open_price = price;
        self.open_date = Some(date);
        self.open_value = number as f64 * price;
        self.open_commission = self.commission_for(self.open_value);
        self.open_total = self.open_value + self.open_commission;
        self.status = PositionStatus::Open;
        ledger.append(self.snapshot());
    }

    /// Move the trailing stop. Percent mode ratchets the stop up to
    /// `price − price × factor/100` and never lowers it; the only
    /// downward movement is the forced reset to 0 on invalid input.
    /// A raised stop emits a ledger snapshot.
    pub fn adjust_stop_loss(
        &mut self,
        mode: Option<StopLossMode>,
        factor: f64,
        price: f64,
        date: NaiveDate,
        ledger: &mut Ledger,
    ) -> Option<Condition> {
        let mode = match mode {
            Some(mode) => mode,
            None => {
                self.stop_loss_price = 0.0;
                return Some(Condition::InvalidStopLossMode);
            }
        };

        match mode {
            StopLossMode::Atr => None,
            StopLossMode::Percent => {
                if !(0.0..=100.0).contains(&factor) {
                    self.stop_loss_price = 0.0;
                    return Some(Condition::StopLossFactorOutOfRange { factor });
                }

                let candidate = price - price * (factor / 100.0);
                if candidate > self.stop_loss_price {
                    self.stop_loss_price = candidate;
                    self.stop_loss_date = Some(date);
                    ledger.append(self.snapshot());
                }
                None
            }
        }
    }

    /// Sell the whole position at `price`. No-op unless open, so a
    /// second close changes nothing. The computed fields stay
    /// inspectable until [`Position::reset`].
    pub fn close(&mut self, price: f64, date: NaiveDate, ledger: &mut Ledger) {
        if self.status != PositionStatus::Open {
            return;
        }

        self.close_price = price;
        self.close_date = Some(date);
        self.close_value = self.stocks_number as f64 * price;
        self.close_commission = self.commission_for(self.close_value);
        self.close_total = self.close_value - self.close_commission;
        self.result = self.close_total - self.open_total;
        self.status = PositionStatus::Flat;
        ledger.append(self.snapshot());
    }

    /// Clear all trade fields and advance the id for the next trade.
    /// Invoked explicitly by the orchestrator after a close.
    pub fn reset(&mut self) {
        *self = Position::new(self.id + 1, self.commission_rate, self.minimum_commission);
    }

    pub fn snapshot(&self) -> LedgerRow {
        LedgerRow {
            id: self.id,
            open_date: self.open_date,
            stocks_number: self.stocks_number,
            open_price: self.open_price,
            open_value: self.open_value,
            open_commission: self.open_commission,
            open_total: self.open_total,
            stop_loss_date: self.stop_loss_date,
            stop_loss_price: self.stop_loss_price,
            close_date: self.close_date,
            close_price: self.close_price,
            close_value: self.close_value,
            close_commission: self.close_commission,
            close_total: self.close_total,
            result: self.result,
        }
    }
}
