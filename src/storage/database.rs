//! `SQLite` database connection and operations.
//!
//! The database is stored at `~/.screentime/screentime.db` and holds one
//! row per closed usage session.
//!
//! File databases run in WAL mode: the tracker and a report command each
//! open their own connection, and readers never wait on the writer.

use std::time::Duration;

use rusqlite::Connection;

use crate::config::Paths;
use crate::error::ScreenTimeError;

use super::migrations;

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at the default location.
    ///
    /// Creates the database file and runs migrations if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open() -> Result<Self, ScreenTimeError> {
        let paths = Paths::new()?;
        paths.ensure_dirs()?;
        Self::open_at(&paths.database)
    }

    /// Open the database at a specific path.
    ///
    /// Creates the database file and runs migrations if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_at(path: &std::path::Path) -> Result<Self, ScreenTimeError> {
        let conn = Connection::open(path).map_err(|e| {
            ScreenTimeError::StoreUnavailable(format!(
                "Failed to open database {}: {e}",
                path.display()
            ))
        })?;

        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| ScreenTimeError::StoreUnavailable(format!("Failed to set busy timeout: {e}")))?;

        let mode: String = conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
            .map_err(|e| ScreenTimeError::StoreUnavailable(format!("Failed to enable WAL: {e}")))?;
        log::debug!("opened {} (journal mode {mode})", path.display());

        let db = Self { conn };
        db.migrate()?;

        Ok(db)
    }

    /// Open an in-memory database (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_in_memory() -> Result<Self, ScreenTimeError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            ScreenTimeError::StoreUnavailable(format!("Failed to open in-memory database: {e}"))
        })?;

        let db = Self { conn };
        db.migrate()?;

        Ok(db)
    }

    /// Run database migrations.
    fn migrate(&self) -> Result<(), ScreenTimeError> {
        migrations::run(&self.conn)
    }

    /// Get the current schema version.
    ///
    /// # Errors
    ///
    /// Returns an error if the version cannot be read.
    pub fn schema_version(&self) -> Result<i32, ScreenTimeError> {
        migrations::get_version(&self.conn)
    }

    /// Get a reference to the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}
