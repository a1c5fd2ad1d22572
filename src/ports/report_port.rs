//! Report generation port trait.

use crate::domain::error::SmacrossError;
use crate::domain::ledger::Ledger;
use std::io::Write;

/// Port for rendering the transaction ledger. Implementations decide
/// the format; the destination is any writer (file, stdout, buffer).
pub trait ReportPort {
    fn write(&self, ledger: &Ledger, out: &mut dyn Write) -> Result<(), SmacrossError>;
}
