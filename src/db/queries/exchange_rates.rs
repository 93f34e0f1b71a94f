use rusqlite::{Connection, ToSql};
use tracing::debug;

use crate::db::ReportFilter;
use crate::models::ExchangeRate;

/// The `date-currency` uniquekey convention used as the de facto primary key.
pub fn uniquekey(date: &str, currency: &str) -> String {
    format!("{}-{}", date, currency)
}

fn row_to_rate(row: &rusqlite::Row<'_>) -> rusqlite::Result<ExchangeRate> {
    Ok(ExchangeRate {
        id: row.get(0)?,
        uniquekey: row.get(1)?,
        date: row.get(2)?,
        currency: row.get(3)?,
        rate: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

pub fn list(conn: &Connection, filter: &ReportFilter) -> rusqlite::Result<Vec<ExchangeRate>> {
    let mut sql = String::from(
        "SELECT id, uniquekey, date, currency, rate, created_at, updated_at
         FROM exchange_rates
         WHERE 1=1",
    );
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();
    filter.push_where_sql(&mut sql, &mut params);
    sql.push_str(" ORDER BY date, currency");

    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let rates = stmt
        .query_map(param_refs.as_slice(), row_to_rate)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    debug!(count = rates.len(), "Listed exchange rates");
    Ok(rates)
}

pub fn uniquekey_exists(conn: &Connection, uniquekey: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM exchange_rates WHERE uniquekey = ?)",
        [uniquekey],
        |row| row.get(0),
    )
}

pub fn create(
    conn: &Connection,
    date: &str,
    currency: &str,
    rate: f64,
) -> rusqlite::Result<i64> {
    let key = uniquekey(date, currency);
    conn.execute(
        "INSERT INTO exchange_rates (uniquekey, date, currency, rate)
         VALUES (?, ?, ?, ?)",
        rusqlite::params![key, date, currency, rate],
    )?;

    let id = conn.last_insert_rowid();
    debug!(uniquekey = %key, rate = rate, "Created exchange rate");
    Ok(id)
}

pub fn update_rate(conn: &Connection, uniquekey: &str, rate: f64) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE exchange_rates SET rate = ?, updated_at = datetime('now')
         WHERE uniquekey = ?",
        rusqlite::params![rate, uniquekey],
    )?;
    if rows > 0 {
        debug!(uniquekey = %uniquekey, rate = rate, "Updated exchange rate");
    }
    Ok(rows > 0)
}

pub fn delete_by_uniquekey(conn: &Connection, uniquekey: &str) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM exchange_rates WHERE uniquekey = ?", [uniquekey])?;
    if rows > 0 {
        debug!(uniquekey = %uniquekey, "Deleted exchange rate");
    }
    Ok(rows > 0)
}
