//! Option lists backing the shared filter dropdowns (year/month/currency/line).

use rusqlite::Connection;

pub fn distinct_years(conn: &Connection) -> rusqlite::Result<Vec<i32>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT year FROM member_report_monthly ORDER BY year DESC",
    )?;
    let years = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(years)
}

pub fn distinct_months(conn: &Connection, year: Option<i32>) -> rusqlite::Result<Vec<u32>> {
    let months = match year {
        Some(year) => {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT month FROM member_report_monthly
                 WHERE year = ? ORDER BY month",
            )?;
            let months = stmt
                .query_map([year], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            months
        }
        None => {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT month FROM member_report_monthly ORDER BY month",
            )?;
            let months = stmt
                .query_map([], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            months
        }
    };
    Ok(months)
}

pub fn distinct_currencies(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT currency FROM member_report_monthly
         UNION
         SELECT DISTINCT currency FROM member_report_daily
         ORDER BY 1",
    )?;
    let currencies = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(currencies)
}

pub fn distinct_lines(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT line FROM member_report_monthly
         UNION
         SELECT DISTINCT line FROM member_report_daily
         ORDER BY 1",
    )?;
    let lines = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(lines)
}
