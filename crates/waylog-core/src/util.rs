//! Shared utility functions used across multiple modules.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{Error, Result};

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Truncate text to at most 180 characters for error messages.
pub fn compact_text(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

/// Current UTC time as an RFC 3339 string with millisecond precision.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 timestamp into epoch milliseconds.
///
/// Timestamps are compared as epoch millis, never lexicographically, so
/// differently formatted but equal instants compare equal.
pub fn rfc3339_to_millis(value: &str) -> Result<i64> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|parsed| parsed.timestamp_millis())
        .map_err(|error| Error::InvalidInput(format!("invalid timestamp '{value}': {error}")))
}
