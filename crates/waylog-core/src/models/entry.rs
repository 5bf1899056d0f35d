//! Journal entry model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Result;
use crate::util::{now_rfc3339, rfc3339_to_millis};

/// A unique identifier for a journal entry, using UUID v7 (time-sortable)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(String);

impl EntryId {
    /// Create a new unique entry ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = crate::Error;

    /// Accepts any non-empty opaque identifier. Locally minted IDs are UUID
    /// v7, but IDs read back from remote records are treated as opaque so
    /// legacy entries keep their original identity.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(crate::Error::InvalidInput(
                "entry id must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// A journal entry, the unit of synchronization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier, assigned at local creation time
    pub id: EntryId,
    /// Entry title
    pub title: String,
    /// Human-readable location label
    pub location: String,
    /// ISO date of the journal day (distinct from the record timestamps)
    pub date: String,
    /// Optional coordinates as `[lon, lat]`
    pub coordinates: Option<[f64; 2]>,
    /// Free-form body content
    pub body: String,
    /// Unpublished work vs published content
    pub draft: bool,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last update timestamp (RFC 3339); the sole conflict-ordering key
    pub updated_at: String,
    /// Remote file path once pushed at least once
    pub remote_path: Option<String>,
    /// Soft delete marker, mirrored through sync
    pub archived: bool,
    /// When the entry was archived (RFC 3339)
    pub archived_at: Option<String>,
    /// Attached media URLs
    pub media: Vec<String>,
}

impl Entry {
    /// Create a new draft entry with the given title, location, and body
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        location: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let now = now_rfc3339();
        Self {
            id: EntryId::new(),
            title: title.into(),
            location: location.into(),
            date: now.chars().take(10).collect(),
            coordinates: None,
            body: body.into(),
            draft: true,
            created_at: now.clone(),
            updated_at: now,
            remote_path: None,
            archived: false,
            archived_at: None,
            media: Vec::new(),
        }
    }

    /// Bump `updated_at` to the current time
    pub fn touch(&mut self) {
        self.updated_at = now_rfc3339();
    }

    /// Mark the entry as archived (soft delete) and bump `updated_at`
    pub fn archive(&mut self) {
        let now = now_rfc3339();
        self.archived = true;
        self.archived_at = Some(now.clone());
        self.updated_at = now;
    }

    /// Clear the archived markers and bump `updated_at`
    pub fn unarchive(&mut self) {
        self.archived = false;
        self.archived_at = None;
        self.touch();
    }

    /// Clear the draft flag (publish) and bump `updated_at`
    pub fn publish(&mut self) {
        self.draft = false;
        self.touch();
    }

    /// `updated_at` as epoch milliseconds, for conflict ordering
    pub fn updated_at_millis(&self) -> Result<i64> {
        rfc3339_to_millis(&self.updated_at)
    }
}
