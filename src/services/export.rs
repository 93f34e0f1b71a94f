//! CSV export buffers for the report endpoints. Result sets are small
//! enough to materialize in memory before serialization.

use crate::error::{AppError, AppResult};
use crate::models::{ExchangeRate, Headcount, MemberReportDaily};

/// `<report>_<YYYYMMDD_HHMMSS>.csv`
pub fn timestamped_filename(report: &str) -> String {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    format!("{}_{}.csv", report, stamp)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> AppResult<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to finalize CSV buffer: {}", e)))
}

pub fn member_report_csv(rows: &[MemberReportDaily]) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record([
            "date",
            "currency",
            "line",
            "deposit_amount",
            "deposit_cases",
            "withdraw_amount",
            "withdraw_cases",
            "active_members",
            "net_profit",
        ])
        .map_err(|e| AppError::Internal(format!("CSV write error: {}", e)))?;

    for row in rows {
        writer
            .write_record([
                row.date.clone(),
                row.currency.clone(),
                row.line.clone(),
                row.deposit_amount.to_string(),
                row.deposit_cases.to_string(),
                row.withdraw_amount.to_string(),
                row.withdraw_cases.to_string(),
                row.active_members.to_string(),
                row.net_profit.to_string(),
            ])
            .map_err(|e| AppError::Internal(format!("CSV write error: {}", e)))?;
    }

    finish(writer)
}

pub fn exchange_rates_csv(rows: &[ExchangeRate]) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["uniquekey", "date", "currency", "rate"])
        .map_err(|e| AppError::Internal(format!("CSV write error: {}", e)))?;

    for row in rows {
        writer
            .write_record([
                row.uniquekey.clone(),
                row.date.clone(),
                row.currency.clone(),
                row.rate.to_string(),
            ])
            .map_err(|e| AppError::Internal(format!("CSV write error: {}", e)))?;
    }

    finish(writer)
}

pub fn headcount_csv(rows: &[Headcount]) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["uniquekey", "year", "month", "department", "headcount"])
        .map_err(|e| AppError::Internal(format!("CSV write error: {}", e)))?;

    for row in rows {
        writer
            .write_record([
                row.uniquekey.clone(),
                row.year.to_string(),
                row.month.to_string(),
                row.department.clone(),
                row.headcount.to_string(),
            ])
            .map_err(|e| AppError::Internal(format!("CSV write error: {}", e)))?;
    }

    finish(writer)
}
