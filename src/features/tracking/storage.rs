//! Session storage.
//!
//! Persists closed sessions to the local database.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Row};

use super::session::Session;
use crate::core::UsageStore;
use crate::error::ScreenTimeError;
use crate::storage::Database;

/// SQLite-backed [`UsageStore`].
pub struct SqliteUsageStore {
    db: Database,
}

impl SqliteUsageStore {
    /// Open the store at the default database location.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn new() -> Result<Self, ScreenTimeError> {
        let db = Database::open()?;
        Ok(Self { db })
    }

    /// Open the store at a specific database path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open_at(path: &std::path::Path) -> Result<Self, ScreenTimeError> {
        let db = Database::open_at(path)?;
        Ok(Self { db })
    }

    /// Create storage with an existing database connection.
    #[must_use]
    pub const fn with_database(db: Database) -> Self {
        Self { db }
    }

    /// Insert a session and record its new row id.
    ///
    /// # Errors
    ///
    /// Returns `ScreenTimeError::StoreUnavailable` if the insert fails.
    pub fn insert(&self, session: &mut Session) -> Result<(), ScreenTimeError> {
        let conn = self.db.connection();

        conn.execute(
            r"INSERT INTO sessions (application_id, start_time, end_time)
              VALUES (?1, ?2, ?3)",
            params![
                session.application_id,
                encode_time(session.start_time),
                encode_time(session.end_time),
            ],
        )
        .map_err(|e| ScreenTimeError::StoreUnavailable(format!("Failed to insert session: {e}")))?;

        session.id = Some(conn.last_insert_rowid());
        Ok(())
    }

    /// Most recent sessions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ScreenTimeError::StoreUnavailable` if the query fails.
    pub fn recent(&self, limit: usize) -> Result<Vec<Session>, ScreenTimeError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(
                r"SELECT id, application_id, start_time, end_time
                  FROM sessions
                  ORDER BY start_time DESC, id DESC
                  LIMIT ?1",
            )
            .map_err(|e| ScreenTimeError::StoreUnavailable(format!("Failed to prepare query: {e}")))?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map([limit], row_to_session)
            .map_err(|e| ScreenTimeError::StoreUnavailable(format!("Failed to query sessions: {e}")))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| ScreenTimeError::StoreUnavailable(e.to_string()))
    }
}

impl UsageStore for SqliteUsageStore {
    fn append(&self, session: &Session) -> Result<(), ScreenTimeError> {
        let mut session = session.clone();
        self.insert(&mut session)
    }

    fn query(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Session>, ScreenTimeError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(
                r"SELECT id, application_id, start_time, end_time
                  FROM sessions
                  WHERE start_time < ?2 AND end_time > ?1",
            )
            .map_err(|e| ScreenTimeError::StoreUnavailable(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([encode_time(start), encode_time(end)], row_to_session)
            .map_err(|e| ScreenTimeError::StoreUnavailable(format!("Failed to query sessions: {e}")))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| ScreenTimeError::StoreUnavailable(e.to_string()))
    }
}

/// Fixed-width UTC timestamp, so text order matches time order.
fn encode_time(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_time(idx: usize, s: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Convert a database row to a Session.
fn row_to_session(row: &Row<'_>) -> Result<Session, rusqlite::Error> {
    let id: i64 = row.get(0)?;
    let application_id: String = row.get(1)?;
    let start_time_str: String = row.get(2)?;
    let end_time_str: String = row.get(3)?;

    Ok(Session {
        id: Some(id),
        application_id,
        start_time: decode_time(2, &start_time_str)?,
        end_time: decode_time(3, &end_time_str)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_test_storage() -> SqliteUsageStore {
        let db = Database::open_in_memory().unwrap();
        SqliteUsageStore::with_database(db)
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, h, m, 0).unwrap()
    }

    #[test]
    fn test_insert_assigns_id() {
        let storage = create_test_storage();

        let mut session = Session::new("Firefox", at(9, 0), at(9, 30));
        storage.insert(&mut session).unwrap();

        assert!(session.id.is_some());
    }

    #[test]
    fn test_query_returns_intersecting_sessions() {
        let storage = create_test_storage();

        storage.append(&Session::new("before", at(7, 0), at(8, 0))).unwrap();
        storage.append(&Session::new("spanning", at(8, 30), at(9, 30))).unwrap();
        storage.append(&Session::new("inside", at(9, 40), at(9, 50))).unwrap();
        storage.append(&Session::new("after", at(10, 0), at(11, 0))).unwrap();

        let mut names: Vec<String> = storage
            .query(at(9, 0), at(10, 0))
            .unwrap()
            .into_iter()
            .map(|s| s.application_id)
            .collect();
        names.sort();

        assert_eq!(names, vec!["inside".to_string(), "spanning".to_string()]);
    }

    #[test]
    fn test_query_preserves_timestamps() {
        let storage = create_test_storage();
        let start = Utc.timestamp_opt(1_700_000_000, 123_456_000).unwrap();
        let end = Utc.timestamp_opt(1_700_000_042, 0).unwrap();

        storage.append(&Session::new("Code", start, end)).unwrap();

        let loaded = storage.query(start, end).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].start_time, start);
        assert_eq!(loaded[0].end_time, end);
    }

    #[test]
    fn test_recent() {
        let storage = create_test_storage();

        for i in 0..5 {
            storage
                .append(&Session::new(format!("app{i}"), at(i, 0), at(i, 30)))
                .unwrap();
        }

        let recent = storage.recent(3).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].application_id, "app4");
        assert_eq!(recent[2].application_id, "app2");
    }

    #[test]
    fn test_reader_sees_writer_sessions() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let db_path = temp_dir.path().join("usage.db");

        let writer = SqliteUsageStore::open_at(&db_path).unwrap();
        let reader = SqliteUsageStore::open_at(&db_path).unwrap();

        writer.append(&Session::new("Terminal", at(9, 0), at(9, 5))).unwrap();
        assert_eq!(reader.query(at(0, 0), at(23, 0)).unwrap().len(), 1);

        writer.append(&Session::new("Browser", at(9, 5), at(9, 6))).unwrap();
        assert_eq!(reader.query(at(0, 0), at(23, 0)).unwrap().len(), 2);
    }
}
