use std::path::Path;

use waylog_core::db::{EntryRepository, SqliteEntryRepository};

use crate::commands::common::{normalize_entry_identifier, open_database, resolve_entry};
use crate::error::CliError;

pub fn run_publish(id: &str, db_path: &Path) -> Result<(), CliError> {
    let normalized_id = normalize_entry_identifier(id)?;
    let db = open_database(db_path)?;
    let repo = SqliteEntryRepository::new(db.connection());
    let mut entry = resolve_entry(&normalized_id, &repo)?;

    if !entry.draft {
        println!("{} is already published", entry.id);
        return Ok(());
    }

    entry.publish();
    repo.upsert(&entry)?;

    println!("{}", entry.id);
    Ok(())
}
