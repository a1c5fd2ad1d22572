//! CSV report adapter.
//!
//! Column order matches the ledger row field order, so the file can be
//! loaded straight into a spreadsheet and the `result` column summed.

use crate::domain::error::SmacrossError;
use crate::domain::ledger::Ledger;
use crate::ports::report_port::ReportPort;
use chrono::NaiveDate;
use std::io;
use std::io::Write;

pub struct CsvReportAdapter;

fn fmt_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, ledger: &Ledger, out: &mut dyn Write) -> Result<(), SmacrossError> {
        let mut wtr = csv::Writer::from_writer(out);

        wtr.write_record([
            "id",
            "open_date",
            "stocks_number",
            "open_price",
            "open_value",
            "open_commission",
            "open_total",
            "stop_loss_date",
            "stop_loss_price",
            "close_date",
            "close_price",
            "close_value",
            "close_commission",
            "close_total",
            "result",
        ])
        .map_err(io::Error::other)?;

        for row in ledger.rows() {
            wtr.write_record([
                row.id.to_string(),
                fmt_date(row.open_date),
                row.stocks_number.to_string(),
                format!("{:.2}", row.open_price),
                format!("{:.2}", row.open_value),
                format!("{:.2}", row.open_commission),
                format!("{:.2}", row.open_total),
                fmt_date(row.stop_loss_date),
                format!("{:.2}", row.stop_loss_price),
                fmt_date(row.close_date),
                format!("{:.2}", row.close_price),
                format!("{:.2}", row.close_value),
                format!("{:.2}", row.close_commission),
                format!("{:.2}", row.close_total),
                format!("{:.2}", row.result),
            ])
            .map_err(io::Error::other)?;
        }

        wtr.flush()?;
        Ok(())
    }
}
