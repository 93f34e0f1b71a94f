use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::models::user::{NewUser, Role, User};

pub fn get_by_username(conn: &Connection, username: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT id, username, password_hash, role, created_at
         FROM users
         WHERE username = ?",
        [username],
        |row| {
            let role_str: String = row.get(3)?;
            Ok(User {
                id: row.get(0)?,
                username: row.get(1)?,
                password_hash: row.get(2)?,
                role: Role::parse(&role_str).unwrap_or(Role::Viewer),
                created_at: row.get(4)?,
            })
        },
    )
    .optional()
}

pub fn create(conn: &Connection, user: &NewUser) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO users (username, password_hash, role) VALUES (?, ?, ?)",
        rusqlite::params![user.username, user.password_hash, user.role.as_str()],
    )?;

    let id = conn.last_insert_rowid();
    debug!(username = %user.username, role = %user.role, "Created user");
    Ok(id)
}

pub fn count(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
}
