//! Recoverable conditions reported during a simulation run.
//!
//! None of these abort a run. The loop collects them as dated events;
//! rendering is left to the caller.

use chrono::NaiveDate;
use std::fmt;

/// A condition the strategy loop recovers from locally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    /// Unrecognized stop-loss mode text; the stop was forced to 0.
    InvalidStopLossMode,
    /// Percent factor outside [0, 100]; the stop was forced to 0.
    StopLossFactorOutOfRange { factor: f64 },
    /// Entry signal present but the budget cannot buy a single share.
    InsufficientFunds { equity: f64 },
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::InvalidStopLossMode => {
                write!(f, "unrecognized stop-loss mode, stop forced to 0")
            }
            Condition::StopLossFactorOutOfRange { factor } => {
                write!(
                    f,
                    "stop-loss factor {factor} outside 0-100, stop forced to 0"
                )
            }
            Condition::InsufficientFunds { equity } => {
                write!(f, "entry signal but equity {equity:.2} affords no shares")
            }
        }
    }
}

/// A condition together with the bar date it was observed on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionEvent {
    pub date: NaiveDate,
    pub condition: Condition,
}
