use std::path::Path;

use waylog_core::db::{EntryRepository, SqliteEntryRepository};

use crate::commands::common::{normalize_entry_identifier, open_database, resolve_entry};
use crate::error::CliError;

/// Hard delete is local-only and restricted to entries that were never
/// pushed; anything on the remote must be archived so sync mirrors it.
pub fn run_delete(id: &str, db_path: &Path) -> Result<(), CliError> {
    let normalized_id = normalize_entry_identifier(id)?;
    let db = open_database(db_path)?;
    let repo = SqliteEntryRepository::new(db.connection());
    let entry = resolve_entry(&normalized_id, &repo)?;

    if entry.remote_path.is_some() {
        return Err(CliError::DeletePushedEntry(entry.id.to_string()));
    }

    repo.delete(&entry.id)?;
    println!("{}", entry.id);
    Ok(())
}
