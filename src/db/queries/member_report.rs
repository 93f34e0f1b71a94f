use rusqlite::{Connection, ToSql};
use tracing::debug;

use crate::db::ReportFilter;
use crate::models::member_report::{MemberReportDaily, MemberReportMonthly};

pub fn list_daily(
    conn: &Connection,
    filter: &ReportFilter,
) -> rusqlite::Result<Vec<MemberReportDaily>> {
    let mut sql = String::from(
        "SELECT id, date, currency, line, deposit_amount, deposit_cases,
                withdraw_amount, withdraw_cases, active_members, net_profit
         FROM member_report_daily
         WHERE 1=1",
    );
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();
    filter.push_where_sql(&mut sql, &mut params);
    sql.push_str(" ORDER BY date, currency, line");

    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(param_refs.as_slice(), |row| {
            Ok(MemberReportDaily {
                id: row.get(0)?,
                date: row.get(1)?,
                currency: row.get(2)?,
                line: row.get(3)?,
                deposit_amount: row.get(4)?,
                deposit_cases: row.get(5)?,
                withdraw_amount: row.get(6)?,
                withdraw_cases: row.get(7)?,
                active_members: row.get(8)?,
                net_profit: row.get(9)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    debug!(count = rows.len(), "Listed daily member report rows");
    Ok(rows)
}

pub fn count_daily(conn: &Connection, filter: &ReportFilter) -> rusqlite::Result<i64> {
    let mut sql = String::from("SELECT COUNT(*) FROM member_report_daily WHERE 1=1");
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();
    filter.push_where_sql(&mut sql, &mut params);

    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    conn.query_row(&sql, param_refs.as_slice(), |row| row.get(0))
}

/// One aggregated row per month of a year, in calendar order.
#[derive(Debug, Clone, Copy)]
pub struct MonthlyAggregate {
    pub month: u32,
    pub deposit_amount: f64,
    pub withdraw_amount: f64,
    pub active_members: i64,
    pub net_profit: f64,
}

pub fn monthly_aggregates(
    conn: &Connection,
    filter: &ReportFilter,
) -> rusqlite::Result<Vec<MonthlyAggregate>> {
    let mut sql = String::from(
        "SELECT month,
                COALESCE(SUM(deposit_amount), 0),
                COALESCE(SUM(withdraw_amount), 0),
                COALESCE(SUM(active_members), 0),
                COALESCE(SUM(net_profit), 0)
         FROM member_report_monthly
         WHERE 1=1",
    );
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();
    filter.push_month_where_sql(&mut sql, &mut params);
    sql.push_str(" GROUP BY month ORDER BY month");

    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(param_refs.as_slice(), |row| {
            Ok(MonthlyAggregate {
                month: row.get(0)?,
                deposit_amount: row.get(1)?,
                withdraw_amount: row.get(2)?,
                active_members: row.get(3)?,
                net_profit: row.get(4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Snapshot rows are produced by the upstream ETL; these inserts exist for
/// seeding and backfills.
pub fn insert_daily(conn: &Connection, row: &MemberReportDaily) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO member_report_daily
            (date, currency, line, deposit_amount, deposit_cases,
             withdraw_amount, withdraw_cases, active_members, net_profit)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        rusqlite::params![
            row.date,
            row.currency,
            row.line,
            row.deposit_amount,
            row.deposit_cases,
            row.withdraw_amount,
            row.withdraw_cases,
            row.active_members,
            row.net_profit,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_monthly(conn: &Connection, row: &MemberReportMonthly) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO member_report_monthly
            (year, month, currency, line, deposit_amount, deposit_cases,
             withdraw_amount, withdraw_cases, active_members, net_profit)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        rusqlite::params![
            row.year,
            row.month,
            row.currency,
            row.line,
            row.deposit_amount,
            row.deposit_cases,
            row.withdraw_amount,
            row.withdraw_cases,
            row.active_members,
            row.net_profit,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Aggregate totals for a single (year, month) across the filtered
/// currencies/lines. Returns zeros when no snapshot exists for the period.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonthTotals {
    pub deposit_amount: f64,
    pub withdraw_amount: f64,
    pub active_members: i64,
    pub net_profit: f64,
}

pub fn month_totals(
    conn: &Connection,
    filter: &ReportFilter,
    year: i32,
    month: u32,
) -> rusqlite::Result<MonthTotals> {
    let mut sql = String::from(
        "SELECT COALESCE(SUM(deposit_amount), 0),
                COALESCE(SUM(withdraw_amount), 0),
                COALESCE(SUM(active_members), 0),
                COALESCE(SUM(net_profit), 0)
         FROM member_report_monthly
         WHERE year = ? AND month = ?",
    );
    let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(year), Box::new(month)];

    let dims = ReportFilter {
        currency: filter.currency.clone(),
        line: filter.line.clone(),
        ..Default::default()
    };
    dims.push_month_where_sql(&mut sql, &mut params);

    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    conn.query_row(&sql, param_refs.as_slice(), |row| {
        Ok(MonthTotals {
            deposit_amount: row.get(0)?,
            withdraw_amount: row.get(1)?,
            active_members: row.get(2)?,
            net_profit: row.get(3)?,
        })
    })
}
