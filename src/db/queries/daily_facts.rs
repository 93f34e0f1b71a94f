//! Aggregates over the per-day transactional fact tables: deposits,
//! withdrawals, new depositors, new registers, and manual adjustments.

use rusqlite::{Connection, ToSql};

use crate::db::ReportFilter;

/// Date-keyed (date, total) pairs in ascending date order.
pub type DailyPoint = (String, f64);

fn sum_query(
    conn: &Connection,
    table: &'static str,
    column: &'static str,
    filter: &ReportFilter,
) -> rusqlite::Result<f64> {
    let mut sql = format!("SELECT COALESCE(SUM({column}), 0) FROM {table} WHERE 1=1");
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();
    filter.push_where_sql(&mut sql, &mut params);

    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    conn.query_row(&sql, param_refs.as_slice(), |row| row.get(0))
}

fn daily_series_query(
    conn: &Connection,
    table: &'static str,
    column: &'static str,
    filter: &ReportFilter,
) -> rusqlite::Result<Vec<DailyPoint>> {
    let mut sql =
        format!("SELECT date, COALESCE(SUM({column}), 0) FROM {table} WHERE 1=1");
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();
    filter.push_where_sql(&mut sql, &mut params);
    sql.push_str(" GROUP BY date ORDER BY date");

    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(param_refs.as_slice(), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn deposit_amount(conn: &Connection, filter: &ReportFilter) -> rusqlite::Result<f64> {
    sum_query(conn, "deposit_daily", "amount", filter)
}

pub fn withdraw_amount(conn: &Connection, filter: &ReportFilter) -> rusqlite::Result<f64> {
    sum_query(conn, "withdraw_daily", "amount", filter)
}

pub fn new_depositor_count(conn: &Connection, filter: &ReportFilter) -> rusqlite::Result<f64> {
    sum_query(conn, "new_depositor", "count", filter)
}

pub fn new_register_count(conn: &Connection, filter: &ReportFilter) -> rusqlite::Result<f64> {
    sum_query(conn, "new_register", "count", filter)
}

pub fn adjustment_amount(conn: &Connection, filter: &ReportFilter) -> rusqlite::Result<f64> {
    sum_query(conn, "adjustment", "amount", filter)
}

pub fn deposit_daily_series(
    conn: &Connection,
    filter: &ReportFilter,
) -> rusqlite::Result<Vec<DailyPoint>> {
    daily_series_query(conn, "deposit_daily", "amount", filter)
}

pub fn withdraw_daily_series(
    conn: &Connection,
    filter: &ReportFilter,
) -> rusqlite::Result<Vec<DailyPoint>> {
    daily_series_query(conn, "withdraw_daily", "amount", filter)
}

pub fn insert_deposit(
    conn: &Connection,
    date: &str,
    currency: &str,
    line: &str,
    amount: f64,
    cases: i64,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO deposit_daily (date, currency, line, amount, cases)
         VALUES (?, ?, ?, ?, ?)",
        rusqlite::params![date, currency, line, amount, cases],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_withdraw(
    conn: &Connection,
    date: &str,
    currency: &str,
    line: &str,
    amount: f64,
    cases: i64,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO withdraw_daily (date, currency, line, amount, cases)
         VALUES (?, ?, ?, ?, ?)",
        rusqlite::params![date, currency, line, amount, cases],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_new_depositor(
    conn: &Connection,
    date: &str,
    currency: &str,
    line: &str,
    count: i64,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO new_depositor (date, currency, line, count) VALUES (?, ?, ?, ?)",
        rusqlite::params![date, currency, line, count],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_new_register(
    conn: &Connection,
    date: &str,
    currency: &str,
    line: &str,
    count: i64,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO new_register (date, currency, line, count) VALUES (?, ?, ?, ?)",
        rusqlite::params![date, currency, line, count],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_adjustment(
    conn: &Connection,
    date: &str,
    currency: &str,
    line: &str,
    amount: f64,
    reason: Option<&str>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO adjustment (date, currency, line, amount, reason)
         VALUES (?, ?, ?, ?, ?)",
        rusqlite::params![date, currency, line, amount, reason],
    )?;
    Ok(conn.last_insert_rowid())
}
