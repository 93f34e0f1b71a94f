use rusqlite::{Connection, ToSql};
use tracing::debug;

use crate::models::Headcount;

fn row_to_headcount(row: &rusqlite::Row<'_>) -> rusqlite::Result<Headcount> {
    Ok(Headcount {
        id: row.get(0)?,
        uniquekey: row.get(1)?,
        year: row.get(2)?,
        month: row.get(3)?,
        department: row.get(4)?,
        headcount: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub fn list(
    conn: &Connection,
    year: Option<i32>,
    month: Option<u32>,
) -> rusqlite::Result<Vec<Headcount>> {
    let mut sql = String::from(
        "SELECT id, uniquekey, year, month, department, headcount, created_at, updated_at
         FROM headcount_dep
         WHERE 1=1",
    );
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();
    if let Some(year) = year {
        sql.push_str(" AND year = ?");
        params.push(Box::new(year));
    }
    if let Some(month) = month {
        sql.push_str(" AND month = ?");
        params.push(Box::new(month));
    }
    sql.push_str(" ORDER BY year, month, department");

    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(param_refs.as_slice(), row_to_headcount)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    debug!(count = rows.len(), "Listed headcount rows");
    Ok(rows)
}

pub fn uniquekey_exists(conn: &Connection, uniquekey: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM headcount_dep WHERE uniquekey = ?)",
        [uniquekey],
        |row| row.get(0),
    )
}

pub fn create(
    conn: &Connection,
    uniquekey: &str,
    year: i32,
    month: u32,
    department: &str,
    headcount: i64,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO headcount_dep (uniquekey, year, month, department, headcount)
         VALUES (?, ?, ?, ?, ?)",
        rusqlite::params![uniquekey, year, month, department, headcount],
    )?;

    let id = conn.last_insert_rowid();
    debug!(uniquekey = %uniquekey, headcount = headcount, "Created headcount row");
    Ok(id)
}

/// Last write wins; there is no concurrency discipline on uniquekey rows.
pub fn update_by_uniquekey(
    conn: &Connection,
    uniquekey: &str,
    headcount: i64,
    department: Option<&str>,
) -> rusqlite::Result<bool> {
    let rows = match department {
        Some(department) => conn.execute(
            "UPDATE headcount_dep
             SET headcount = ?, department = ?, updated_at = datetime('now')
             WHERE uniquekey = ?",
            rusqlite::params![headcount, department, uniquekey],
        )?,
        None => conn.execute(
            "UPDATE headcount_dep SET headcount = ?, updated_at = datetime('now')
             WHERE uniquekey = ?",
            rusqlite::params![headcount, uniquekey],
        )?,
    };
    if rows > 0 {
        debug!(uniquekey = %uniquekey, "Updated headcount row");
    }
    Ok(rows > 0)
}

pub fn delete_by_uniquekey(conn: &Connection, uniquekey: &str) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM headcount_dep WHERE uniquekey = ?", [uniquekey])?;
    if rows > 0 {
        debug!(uniquekey = %uniquekey, "Deleted headcount row");
    }
    Ok(rows > 0)
}
