//! Remote record codec.
//!
//! Serializes an [`Entry`] to the remote store's text format (a frontmatter
//! metadata block followed by the raw body) and parses it back. The grammar is
//! fixed, so the frontmatter is hand-rolled rather than pulled through a YAML
//! crate.
//!
//! The canonical entry `id` is always carried in the metadata block. Deriving
//! it from the storage location is only a read fallback for legacy files and
//! is logged, because path-derived IDs historically diverged from the local
//! IDs that pushed them and produced duplicate entries.

use std::fmt::Write as _;

use tracing::warn;

use crate::error::{Error, Result};
use crate::models::{Entry, EntryId};

const FRONTMATTER_DELIMITER: &str = "---";

/// Serialize an entry to the remote record format.
///
/// The metadata block is emitted in fixed order: id, title, date, location,
/// coordinates, createdAt, updatedAt, draft, archived, archivedAt, media.
/// Optional fields are omitted entirely when absent.
#[must_use]
pub fn encode_entry(entry: &Entry) -> String {
    let mut out = String::new();
    out.push_str(FRONTMATTER_DELIMITER);
    out.push('\n');

    let _ = writeln!(out, "id: {}", quote(entry.id.as_str()));
    let _ = writeln!(out, "title: {}", quote(&entry.title));
    let _ = writeln!(out, "date: {}", quote(&entry.date));
    let _ = writeln!(out, "location: {}", quote(&entry.location));
    if let Some([lon, lat]) = entry.coordinates {
        let _ = writeln!(out, "coordinates: [{lon}, {lat}]");
    }
    let _ = writeln!(out, "createdAt: {}", quote(&entry.created_at));
    let _ = writeln!(out, "updatedAt: {}", quote(&entry.updated_at));
    if entry.draft {
        out.push_str("draft: true\n");
    }
    if entry.archived {
        out.push_str("archived: true\n");
        if let Some(archived_at) = &entry.archived_at {
            let _ = writeln!(out, "archivedAt: {}", quote(archived_at));
        }
    }
    if !entry.media.is_empty() {
        out.push_str("media:\n");
        for url in &entry.media {
            let _ = writeln!(out, "  - {}", quote(url));
        }
    }

    out.push_str(FRONTMATTER_DELIMITER);
    out.push_str("\n\n");
    out.push_str(&entry.body);
    out
}

/// Parse a remote record back into an entry.
///
/// A missing or unterminated metadata block is a hard parse failure; the
/// caller skips the record rather than defaulting it. `fallback_stem` is the
/// storage file stem, consulted for the ID only when the metadata block does
/// not carry one.
pub fn decode_entry(content: &str, fallback_stem: Option<&str>) -> Result<Entry> {
    let (frontmatter, body) = split_frontmatter(content)?;

    let mut id: Option<String> = None;
    let mut title = String::new();
    let mut date = String::new();
    let mut location = String::new();
    let mut coordinates: Option<[f64; 2]> = None;
    let mut created_at = String::new();
    let mut updated_at = String::new();
    let mut draft = false;
    let mut archived = false;
    let mut archived_at: Option<String> = None;
    let mut media: Vec<String> = Vec::new();
    let mut in_media_list = false;

    for line in frontmatter.lines() {
        if in_media_list {
            let trimmed = line.trim_start();
            if let Some(item) = trimmed.strip_prefix("- ") {
                media.push(unquote(item));
                continue;
            }
            in_media_list = false;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "id" => id = non_empty(unquote(value)),
            "title" => title = unquote(value),
            "date" => date = unquote(value),
            "location" => location = unquote(value),
            "coordinates" => coordinates = parse_coordinates(value),
            "createdAt" => created_at = unquote(value),
            "updatedAt" => updated_at = unquote(value),
            "draft" => draft = value == "true",
            "archived" => archived = value == "true",
            "archivedAt" => archived_at = non_empty(unquote(value)),
            "media" => in_media_list = value.is_empty(),
            _ => {}
        }
    }

    let id = match id {
        Some(id) => id,
        None => {
            let stem = fallback_stem
                .map(str::trim)
                .filter(|stem| !stem.is_empty())
                .ok_or_else(|| {
                    Error::Parse("record carries no id and no file name to derive one".to_string())
                })?;
            warn!(stem, "record is missing an id field, deriving from file name");
            stem.to_string()
        }
    };

    if updated_at.is_empty() {
        return Err(Error::Parse(format!(
            "record '{id}' is missing an updatedAt field"
        )));
    }

    Ok(Entry {
        id: id.parse::<EntryId>()?,
        title,
        location,
        date,
        coordinates,
        body,
        draft,
        created_at,
        updated_at,
        remote_path: None,
        archived,
        archived_at,
        media,
    })
}

/// Split content into the frontmatter block and the body.
///
/// The block must open with `---` on the first line and close with a matching
/// `---` line. Anything else is a parse failure.
fn split_frontmatter(content: &str) -> Result<(&str, String)> {
    let trimmed = content.trim_start_matches('\u{feff}');
    let mut rest = trimmed
        .strip_prefix(FRONTMATTER_DELIMITER)
        .ok_or_else(|| Error::Parse("record has no frontmatter block".to_string()))?;
    rest = rest
        .strip_prefix('\n')
        .or_else(|| rest.strip_prefix("\r\n"))
        .ok_or_else(|| Error::Parse("record has no frontmatter block".to_string()))?;

    let close = rest
        .find("\n---")
        .ok_or_else(|| Error::Parse("frontmatter block is unterminated".to_string()))?;
    let frontmatter = &rest[..close];

    let after = &rest[close + 4..];
    let body = after
        .strip_prefix("\r\n")
        .or_else(|| after.strip_prefix('\n'))
        .unwrap_or(after);
    // One blank separator line belongs to the format, not the body.
    let body = body
        .strip_prefix("\r\n")
        .or_else(|| body.strip_prefix('\n'))
        .unwrap_or(body);

    Ok((frontmatter, body.to_string()))
}

fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

fn unquote(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1]
            .replace("\\\"", "\"")
            .replace("\\\\", "\\")
    } else {
        trimmed.to_string()
    }
}

fn parse_coordinates(value: &str) -> Option<[f64; 2]> {
    let inner = value.trim().strip_prefix('[')?.strip_suffix(']')?;
    let mut parts = inner.split(',').map(str::trim);
    let lon = parts.next()?.parse::<f64>().ok()?;
    let lat = parts.next()?.parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some([lon, lat])
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_entry() -> Entry {
        let mut entry = Entry::new("Old town walk", "Tallinn, Estonia", "Cobblestones and fog.\n\nCoffee at Pierre.");
        entry.date = "2025-03-14".to_string();
        entry.coordinates = Some([24.7454, 59.4372]);
        entry.created_at = "2025-03-14T08:30:00.000Z".to_string();
        entry.updated_at = "2025-03-15T10:05:00.000Z".to_string();
        entry.media = vec!["https://photos.example.com/a.jpg".to_string()];
        entry
    }

    #[test]
    fn encode_emits_fixed_order() {
        let entry = sample_entry();
        let encoded = encode_entry(&entry);
        let lines: Vec<&str> = encoded.lines().collect();
        assert_eq!(lines[0], "---");
        assert!(lines[1].starts_with("id: "));
        assert!(lines[2].starts_with("title: "));
        assert!(lines[3].starts_with("date: "));
        assert!(lines[4].starts_with("location: "));
        assert!(lines[5].starts_with("coordinates: "));
        assert!(lines[6].starts_with("createdAt: "));
        assert!(lines[7].starts_with("updatedAt: "));
        assert_eq!(lines[8], "draft: true");
        assert_eq!(lines[9], "media:");
    }

    #[test]
    fn round_trip_preserves_fields() {
        let entry = sample_entry();
        let decoded = decode_entry(&encode_entry(&entry), None).unwrap();
        assert_eq!(decoded.id, entry.id);
        assert_eq!(decoded.title, entry.title);
        assert_eq!(decoded.date, entry.date);
        assert_eq!(decoded.location, entry.location);
        assert_eq!(decoded.coordinates, entry.coordinates);
        assert_eq!(decoded.created_at, entry.created_at);
        assert_eq!(decoded.updated_at, entry.updated_at);
        assert_eq!(decoded.draft, entry.draft);
        assert_eq!(decoded.archived, entry.archived);
        assert_eq!(decoded.media, entry.media);
        assert_eq!(decoded.body, entry.body);
    }

    #[test]
    fn round_trip_preserves_archived_markers() {
        let mut entry = sample_entry();
        entry.archive();
        let decoded = decode_entry(&encode_entry(&entry), None).unwrap();
        assert!(decoded.archived);
        assert_eq!(decoded.archived_at, entry.archived_at);
    }

    #[test]
    fn round_trip_escapes_quotes() {
        let mut entry = sample_entry();
        entry.title = "A \"quoted\" title \\ with backslash".to_string();
        let decoded = decode_entry(&encode_entry(&entry), None).unwrap();
        assert_eq!(decoded.title, entry.title);
    }

    #[test]
    fn decode_requires_frontmatter_block() {
        assert!(decode_entry("just a body", None).is_err());
        assert!(decode_entry("---\nid: \"x\"\nno closing delimiter", None).is_err());
    }

    #[test]
    fn decode_prefers_metadata_id_over_file_stem() {
        let entry = sample_entry();
        let decoded = decode_entry(&encode_entry(&entry), Some("2025-03-14-old-town")).unwrap();
        assert_eq!(decoded.id, entry.id);
    }

    #[test]
    fn decode_falls_back_to_file_stem_for_legacy_records() {
        let legacy = "---\ntitle: \"Legacy\"\nupdatedAt: \"2024-01-01T00:00:00Z\"\n---\n\nbody";
        let decoded = decode_entry(legacy, Some("2024-01-01-legacy")).unwrap();
        assert_eq!(decoded.id.as_str(), "2024-01-01-legacy");
    }

    #[test]
    fn decode_without_id_or_stem_fails() {
        let legacy = "---\ntitle: \"Legacy\"\nupdatedAt: \"2024-01-01T00:00:00Z\"\n---\n\nbody";
        assert!(decode_entry(legacy, None).is_err());
    }

    #[test]
    fn decode_requires_updated_at() {
        let record = "---\nid: \"abc\"\ntitle: \"No clock\"\n---\n\nbody";
        assert!(decode_entry(record, None).is_err());
    }

    #[test]
    fn decode_ignores_unknown_keys() {
        let record = "---\nid: \"abc\"\nupdatedAt: \"2024-01-01T00:00:00Z\"\nmood: \"sunny\"\n---\n\nbody";
        let decoded = decode_entry(record, None).unwrap();
        assert_eq!(decoded.id.as_str(), "abc");
        assert_eq!(decoded.body, "body");
    }

    #[test]
    fn decode_media_list_stops_at_next_key() {
        let record = concat!(
            "---\n",
            "id: \"abc\"\n",
            "media:\n",
            "  - \"https://photos.example.com/1.jpg\"\n",
            "  - \"https://photos.example.com/2.jpg\"\n",
            "updatedAt: \"2024-01-01T00:00:00Z\"\n",
            "---\n",
            "\n",
            "body"
        );
        let decoded = decode_entry(record, None).unwrap();
        assert_eq!(decoded.media.len(), 2);
        assert_eq!(decoded.updated_at, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn empty_body_round_trips() {
        let mut entry = sample_entry();
        entry.body = String::new();
        let decoded = decode_entry(&encode_entry(&entry), None).unwrap();
        assert_eq!(decoded.body, "");
    }

    #[test]
    fn coordinates_parse_rejects_malformed_values() {
        assert_eq!(parse_coordinates("[1.0]"), None);
        assert_eq!(parse_coordinates("[1.0, 2.0, 3.0]"), None);
        assert_eq!(parse_coordinates("not a list"), None);
        assert_eq!(parse_coordinates("[24.7454, 59.4372]"), Some([24.7454, 59.4372]));
    }
}
