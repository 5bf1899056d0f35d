use std::path::Path;

use waylog_core::db::{EntryRepository, SqliteEntryRepository};
use waylog_core::Entry;

use crate::commands::common::{normalize_title, open_database, resolve_body};
use crate::error::CliError;

pub fn run_add(
    title: &str,
    location: &str,
    lon: Option<f64>,
    lat: Option<f64>,
    body_parts: &[String],
    db_path: &Path,
) -> Result<(), CliError> {
    let title = normalize_title(title)?;
    let body = resolve_body(body_parts)?;

    let mut entry = Entry::new(title, location.trim(), body);
    if let (Some(lon), Some(lat)) = (lon, lat) {
        entry.coordinates = Some([lon, lat]);
    }

    let db = open_database(db_path)?;
    let repo = SqliteEntryRepository::new(db.connection());
    repo.upsert(&entry)?;

    println!("{}", entry.id);
    Ok(())
}
