//! The bar-by-bar strategy loop.
//!
//! A deterministic fold over a chronologically ordered bar series:
//! every decision depends on the state the previous bars left behind,
//! so bars are never reordered or processed in parallel.

use chrono::NaiveDate;

use super::account::Account;
use super::bar::SignalBar;
use super::condition::{Condition, ConditionEvent};
use super::ledger::Ledger;
use super::position::{Position, PositionStatus, StopLossMode};

/// Simulation parameters: budget, commission model, stop rule, windows.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    pub initial_equity: f64,
    pub commission_rate: f64,
    pub minimum_commission: f64,
    /// `None` when the configured mode text was unrecognized; every
    /// stop adjustment then forces the stop to 0 and reports it.
    pub stop_loss_mode: Option<StopLossMode>,
    pub stop_loss_percent: f64,
    pub fast_window: usize,
    pub slow_window: usize,
}

impl Default for SimulationParams {
    fn default() -> Self {
        SimulationParams {
            initial_equity: 1000.0,
            commission_rate: 0.0039,
            minimum_commission: 3.0,
            stop_loss_mode: Some(StopLossMode::Percent),
            stop_loss_percent: 10.0,
            fast_window: 10,
            slow_window: 30,
        }
    }
}

/// All mutable state of one run: the account, the single live
/// position, the ledger, and the event counters. A second run must
/// build a fresh context; nothing is shared between runs.
#[derive(Debug)]
pub struct Simulation {
    params: SimulationParams,
    pub account: Account,
    pub position: Position,
    pub ledger: Ledger,
    pub conditions: Vec<ConditionEvent>,
    pub exit_signals_seen: usize,
    pub bars_processed: usize,
    pub bars_skipped: usize,
}

impl Simulation {
    pub fn new(params: SimulationParams) -> Self {
        let account = Account::new(params.initial_equity);
        let position = Position::new(0, params.commission_rate, params.minimum_commission);
        Simulation {
            params,
            account,
            position,
            ledger: Ledger::new(),
            conditions: Vec::new(),
            exit_signals_seen: 0,
            bars_processed: 0,
            bars_skipped: 0,
        }
    }

    /// Apply the decision procedure to one bar.
    pub fn step(&mut self, bar: &SignalBar) {
        let Some((fast_ma, slow_ma)) = bar.averages() else {
            // Warmup rows carry no averages and make no decisions.
            self.bars_skipped += 1;
            return;
        };
        self.bars_processed += 1;

        match self.position.status {
            PositionStatus::Flat => self.consider_entry(bar, fast_ma, slow_ma),
            PositionStatus::Open => self.manage_open(bar, fast_ma, slow_ma),
        }
    }

    fn consider_entry(&mut self, bar: &SignalBar, fast_ma: f64, slow_ma: f64) {
        if fast_ma <= slow_ma || bar.open == 0.0 {
            return;
        }

        if self.account.equity <= self.params.minimum_commission {
            self.report(
                bar.date,
                Condition::InsufficientFunds {
                    equity: self.account.equity,
                },
            );
            return;
        }

        let number = self.position.size_for(bar.open, self.account.equity);
        if number <= 0 {
            self.report(
                bar.date,
                Condition::InsufficientFunds {
                    equity: self.account.equity,
                },
            );
            return;
        }

        self.position.open(number, bar.open, bar.date, &mut self.ledger);
        self.account.apply_delta(-self.position.open_total);
        self.adjust_stop(bar.open, bar.date);
    }

    fn manage_open(&mut self, bar: &SignalBar, fast_ma: f64, slow_ma: f64) {
        if fast_ma < slow_ma {
            // The crossover back down is observed but does not close
            // the trade; the trailing stop is the only exit.
            self.exit_signals_seen += 1;
        }

        if self.position.stop_loss_price > bar.low {
            let stop = self.position.stop_loss_price;
            self.position.close(stop, bar.date, &mut self.ledger);
            self.account.apply_delta(self.position.close_total);
            self.position.reset();
        } else {
            self.adjust_stop(bar.close, bar.date);
        }
    }

    fn adjust_stop(&mut self, price: f64, date: NaiveDate) {
        if let Some(condition) = self.position.adjust_stop_loss(
            self.params.stop_loss_mode,
            self.params.stop_loss_percent,
            price,
            date,
            &mut self.ledger,
        ) {
            self.report(date, condition);
        }
    }

    fn report(&mut self, date: NaiveDate, condition: Condition) {
        self.conditions.push(ConditionEvent { date, condition });
    }

    /// Fold the whole series, consuming the context. A position still
    /// open at the end stays open; its entry snapshot is already in
    /// the ledger.
    pub fn run(mut self, bars: &[SignalBar]) -> SimulationResult {
        for bar in bars {
            self.step(bar);
        }

        SimulationResult {
            total_result: self.ledger.total_result(),
            ledger: self.ledger,
            account: self.account,
            position: self.position,
            conditions: self.conditions,
            exit_signals_seen: self.exit_signals_seen,
            bars_processed: self.bars_processed,
            bars_skipped: self.bars_skipped,
        }
    }
}

/// Everything a completed run produces. Always present, even for an
/// empty series (empty ledger, zero aggregate).
#[derive(Debug)]
pub struct SimulationResult {
    pub ledger: Ledger,
    pub account: Account,
    pub position: Position,
    pub conditions: Vec<ConditionEvent>,
    pub exit_signals_seen: usize,
    pub bars_processed: usize,
    pub bars_skipped: usize,
    pub total_result: f64,
}

/// Convenience entry point: fresh context, full fold.
pub fn run_simulation(bars: &[SignalBar], params: SimulationParams) -> SimulationResult {
    Simulation::new(params).run(bars)
}
