//! Settings repository implementation

use crate::error::Result;
use rusqlite::{params, Connection};

/// Key under which the last completed sync time (epoch millis) is stored.
pub const LAST_SYNC_COMPLETED_AT: &str = "last_sync_completed_at";

/// Trait for settings storage operations
pub trait SettingsRepository {
    /// Read a setting value
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a setting value
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// `SQLite` implementation of `SettingsRepository`
pub struct SqliteSettingsRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteSettingsRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Last completed sync time as epoch millis, if any
    pub fn last_sync_completed_at(&self) -> Result<Option<i64>> {
        Ok(self
            .get(LAST_SYNC_COMPLETED_AT)?
            .and_then(|value| value.parse().ok()))
    }

    /// Persist the last completed sync time
    pub fn set_last_sync_completed_at(&self, at: i64) -> Result<()> {
        self.set(LAST_SYNC_COMPLETED_AT, &at.to_string())
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let result = self.conn.query_row(
            "SELECT value FROM settings WHERE key = ?",
            params![key],
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }
}
