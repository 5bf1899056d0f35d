//! Entry repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT/OFFSET

use crate::error::{Error, Result};
use crate::models::{Entry, EntryId};
use rusqlite::{params, Connection};

/// Trait for entry storage operations
pub trait EntryRepository {
    /// Insert or replace an entry verbatim, keyed by id
    fn upsert(&self, entry: &Entry) -> Result<Entry>;

    /// Get an entry by ID
    fn get(&self, id: &EntryId) -> Result<Option<Entry>>;

    /// List entries (excluding archived), newest first
    fn list(&self, limit: usize, offset: usize) -> Result<Vec<Entry>>;

    /// Full listing including archived entries, as consumed by sync
    fn list_all(&self) -> Result<Vec<Entry>>;

    /// Soft delete an entry (archive markers, mirrored through sync)
    fn archive(&self, id: &EntryId) -> Result<()>;

    /// Hard delete an entry, local-only
    fn delete(&self, id: &EntryId) -> Result<()>;
}

/// `SQLite` implementation of `EntryRepository`
pub struct SqliteEntryRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteEntryRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse an entry from a database row
    fn parse_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<Entry> {
        let id: String = row.get(0)?;
        // A stored id that fails to parse is corruption, never a fresh identity.
        let id: EntryId = id.parse().map_err(|error: crate::Error| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(error),
            )
        })?;
        let coordinates: Option<String> = row.get(4)?;
        let media: String = row.get(12)?;
        Ok(Entry {
            id,
            title: row.get(1)?,
            location: row.get(2)?,
            date: row.get(3)?,
            coordinates: coordinates.and_then(|raw| serde_json::from_str(&raw).ok()),
            body: row.get(5)?,
            draft: row.get::<_, i32>(6)? != 0,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
            remote_path: row.get(9)?,
            archived: row.get::<_, i32>(10)? != 0,
            archived_at: row.get(11)?,
            media: serde_json::from_str(&media).unwrap_or_default(),
        })
    }
}

const ENTRY_COLUMNS: &str = "id, title, location, date, coordinates, body, draft, \
     created_at, updated_at, remote_path, archived, archived_at, media";

impl EntryRepository for SqliteEntryRepository<'_> {
    fn upsert(&self, entry: &Entry) -> Result<Entry> {
        let coordinates = entry
            .coordinates
            .map(|value| serde_json::to_string(&value))
            .transpose()?;
        let media = serde_json::to_string(&entry.media)?;

        self.conn.execute(
            "INSERT INTO entries (id, title, location, date, coordinates, body, draft,
                                  created_at, updated_at, remote_path, archived, archived_at, media)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
             ON CONFLICT(id) DO UPDATE SET
                 title = excluded.title,
                 location = excluded.location,
                 date = excluded.date,
                 coordinates = excluded.coordinates,
                 body = excluded.body,
                 draft = excluded.draft,
                 created_at = excluded.created_at,
                 updated_at = excluded.updated_at,
                 remote_path = excluded.remote_path,
                 archived = excluded.archived,
                 archived_at = excluded.archived_at,
                 media = excluded.media",
            params![
                entry.id.as_str(),
                entry.title,
                entry.location,
                entry.date,
                coordinates,
                entry.body,
                i32::from(entry.draft),
                entry.created_at,
                entry.updated_at,
                entry.remote_path,
                i32::from(entry.archived),
                entry.archived_at,
                media,
            ],
        )?;

        Ok(entry.clone())
    }

    fn get(&self, id: &EntryId) -> Result<Option<Entry>> {
        let result = self.conn.query_row(
            &format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?"),
            params![id.as_str()],
            Self::parse_entry,
        );

        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, limit: usize, offset: usize) -> Result<Vec<Entry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS}
             FROM entries
             WHERE archived = 0
             ORDER BY updated_at DESC
             LIMIT ? OFFSET ?"
        ))?;

        let entries = stmt
            .query_map(params![limit as i64, offset as i64], Self::parse_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(entries)
    }

    fn list_all(&self) -> Result<Vec<Entry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entries ORDER BY updated_at DESC"
        ))?;

        let entries = stmt
            .query_map([], Self::parse_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(entries)
    }

    fn archive(&self, id: &EntryId) -> Result<()> {
        let now = crate::util::now_rfc3339();

        let rows = self.conn.execute(
            "UPDATE entries SET archived = 1, archived_at = ?, updated_at = ?
             WHERE id = ? AND archived = 0",
            params![now, now, id.as_str()],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn delete(&self, id: &EntryId) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM entries WHERE id = ?", params![id.as_str()])?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        Ok(())
    }
}
