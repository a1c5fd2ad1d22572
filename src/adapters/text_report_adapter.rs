//! Fixed-width text report adapter.

use crate::domain::error::SmacrossError;
use crate::domain::ledger::{Ledger, LedgerRow};
use crate::ports::report_port::ReportPort;
use chrono::NaiveDate;
use std::io::Write;

pub struct TextReportAdapter;

fn fmt_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    }
}

fn write_row(out: &mut dyn Write, row: &LedgerRow) -> std::io::Result<()> {
    writeln!(
        out,
        "{:>4}  {:>10}  {:>6}  {:>9.2}  {:>10.2}  {:>9.2}  {:>10.2}  {:>10}  {:>9.2}  {:>10}  {:>9.2}  {:>10.2}  {:>10.2}  {:>11.2}  {:>10.2}",
        row.id,
        fmt_date(row.open_date),
        row.stocks_number,
        row.open_price,
        row.open_value,
        row.open_commission,
        row.open_total,
        fmt_date(row.stop_loss_date),
        row.stop_loss_price,
        fmt_date(row.close_date),
        row.close_price,
        row.close_value,
        row.close_commission,
        row.close_total,
        row.result,
    )
}

impl ReportPort for TextReportAdapter {
    fn write(&self, ledger: &Ledger, out: &mut dyn Write) -> Result<(), SmacrossError> {
        if ledger.is_empty() {
            writeln!(out, "no transactions recorded")?;
            return Ok(());
        }

        writeln!(
            out,
            "{:>4}  {:>10}  {:>6}  {:>9}  {:>10}  {:>9}  {:>10}  {:>10}  {:>9}  {:>10}  {:>9}  {:>10}  {:>10}  {:>11}  {:>10}",
            "id",
            "open_date",
            "stocks",
            "open",
            "open_val",
            "open_comm",
            "open_total",
            "sl_date",
            "sl",
            "close_date",
            "close",
            "close_val",
            "close_comm",
            "close_total",
            "result",
        )?;

        for row in ledger.rows() {
            write_row(out, row)?;
        }

        writeln!(out)?;
        writeln!(out, "total result: {:.2}", ledger.total_result())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2019, 7, day)
    }

    fn open_row() -> LedgerRow {
        LedgerRow {
            id: 0,
            open_date: date(10),
            stocks_number: 5,
            open_price: 127.0,
            open_value: 635.0,
            open_commission: 3.0,
            open_total: 638.0,
            stop_loss_date: None,
            stop_loss_price: 0.0,
            close_date: None,
            close_price: 0.0,
            close_value: 0.0,
            close_commission: 0.0,
            close_total: 0.0,
            result: 0.0,
        }
    }

    fn close_row() -> LedgerRow {
        LedgerRow {
            close_date: date(12),
            close_price: 125.0,
            close_value: 625.0,
            close_commission: 3.0,
            close_total: 622.0,
            result: -16.0,
            ..open_row()
        }
    }

    fn render(ledger: &Ledger) -> String {
        let mut buf = Vec::new();
        TextReportAdapter.write(ledger, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_ledger_renders_placeholder() {
        let output = render(&Ledger::new());
        assert!(output.contains("no transactions recorded"));
    }

    #[test]
    fn renders_header_rows_and_total() {
        let mut ledger = Ledger::new();
        ledger.append(open_row());
        ledger.append(close_row());

        let output = render(&ledger);

        assert!(output.contains("open_date"));
        assert!(output.contains("2019-07-10"));
        assert!(output.contains("2019-07-12"));
        assert!(output.contains("total result: -16.00"));
    }

    #[test]
    fn missing_dates_render_as_dash() {
        let mut ledger = Ledger::new();
        ledger.append(open_row());

        let output = render(&ledger);
        let data_line = output.lines().nth(1).unwrap();
        assert!(data_line.contains('-'));
        assert!(output.contains("total result: 0.00"));
    }

    #[test]
    fn one_line_per_ledger_row() {
        let mut ledger = Ledger::new();
        ledger.append(open_row());
        ledger.append(close_row());

        let output = render(&ledger);
        // Header, two rows, blank line, total.
        assert_eq!(output.lines().count(), 5);
    }
}
