//! Connection setup and schema initialisation for the SQLite database.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;

use crate::Result;

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// The unique index on `attendance (user_id, subject_code, date)` is what makes
/// the upsert in [`crate::manager::AttendanceManager::resolve`] atomic.
pub const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS accounts (
    user_id       TEXT PRIMARY KEY NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at    TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS sessions (
    token      TEXT PRIMARY KEY NOT NULL,
    user_id    TEXT NOT NULL REFERENCES accounts(user_id),
    email      TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS profiles (
    id         INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    user_id    TEXT NOT NULL UNIQUE REFERENCES accounts(user_id),
    first_name TEXT NOT NULL,
    last_name  TEXT NOT NULL,
    email      TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS courses (
    id           INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    user_id      TEXT NOT NULL REFERENCES accounts(user_id),
    subject_code TEXT NOT NULL,
    subject_name TEXT NOT NULL,
    created_at   TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE (user_id, subject_code)
);

CREATE TABLE IF NOT EXISTS attendance (
    id           INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    user_id      TEXT NOT NULL REFERENCES accounts(user_id),
    subject_code TEXT NOT NULL,
    date         DATE NOT NULL,
    status       TEXT NOT NULL CHECK (status IN ('present', 'absent')),
    UNIQUE (user_id, subject_code, date)
);

CREATE INDEX IF NOT EXISTS attendance_user_date_idx ON attendance(user_id, date);
";

/// Opens a connection to `database_url` and makes sure the schema exists.
pub fn establish(database_url: &str) -> Result<SqliteConnection> {
    let mut connection = SqliteConnection::establish(database_url)?;
    connection.batch_execute(SCHEMA)?;

    tracing::debug!(database_url, "database ready");

    Ok(connection)
}
