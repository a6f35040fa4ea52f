//! Database migrations for screentime.
//!
//! Each migration is a function that upgrades the schema by one version.
//! Migrations are run automatically when the database is opened.

use rusqlite::Connection;

use crate::error::ScreenTimeError;

/// Current schema version.
const CURRENT_VERSION: i32 = 1;

/// Get the current schema version from the database.
///
/// Returns 0 if no version has been set (new database).
pub fn get_version(conn: &Connection) -> Result<i32, ScreenTimeError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| ScreenTimeError::StoreUnavailable(format!("Failed to get schema version: {e}")))
}

/// Set the schema version in the database.
fn set_version(conn: &Connection, version: i32) -> Result<(), ScreenTimeError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| ScreenTimeError::StoreUnavailable(format!("Failed to set schema version: {e}")))
}

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<(), ScreenTimeError> {
    let current = get_version(conn)?;

    if current >= CURRENT_VERSION {
        return Ok(());
    }

    for version in (current + 1)..=CURRENT_VERSION {
        run_migration(conn, version)?;
        set_version(conn, version)?;
    }

    Ok(())
}

/// Run a specific migration.
fn run_migration(conn: &Connection, version: i32) -> Result<(), ScreenTimeError> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(ScreenTimeError::StoreUnavailable(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: closed usage sessions.
///
/// Timestamps are fixed-width UTC RFC 3339 strings, so range filters can
/// compare them as text.
fn migrate_v1(conn: &Connection) -> Result<(), ScreenTimeError> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            application_id TEXT NOT NULL CHECK (length(application_id) > 0),
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL CHECK (end_time >= start_time)
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_start
        ON sessions(start_time);

        CREATE INDEX IF NOT EXISTS idx_sessions_end
        ON sessions(end_time);
        ",
    )
    .map_err(|e| ScreenTimeError::StoreUnavailable(format!("Migration v1 failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_v1() {
        let conn = Connection::open_in_memory().unwrap();

        run(&conn).unwrap();
        assert_eq!(get_version(&conn).unwrap(), CURRENT_VERSION);

        conn.execute(
            "INSERT INTO sessions (application_id, start_time, end_time)
             VALUES ('Firefox', '2024-01-01T10:00:00.000000Z', '2024-01-01T10:25:00.000000Z')",
            [],
        )
        .unwrap();
    }

    #[test]
    fn test_rejects_invalid_sessions() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();

        let empty_app = conn.execute(
            "INSERT INTO sessions (application_id, start_time, end_time)
             VALUES ('', '2024-01-01T10:00:00.000000Z', '2024-01-01T10:25:00.000000Z')",
            [],
        );
        assert!(empty_app.is_err());

        let reversed = conn.execute(
            "INSERT INTO sessions (application_id, start_time, end_time)
             VALUES ('Firefox', '2024-01-01T10:25:00.000000Z', '2024-01-01T10:00:00.000000Z')",
            [],
        );
        assert!(reversed.is_err());
    }

    #[test]
    fn test_migration_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        run(&conn).unwrap();
        run(&conn).unwrap();

        assert_eq!(get_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_get_version_new_database() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(get_version(&conn).unwrap(), 0);
    }
}
