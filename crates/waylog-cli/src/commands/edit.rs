use std::path::Path;

use waylog_core::db::{EntryRepository, SqliteEntryRepository};

use crate::commands::common::{
    capture_editor_input_with_initial, normalize_entry_identifier, open_database, resolve_entry,
};
use crate::error::CliError;

pub fn run_edit(id: &str, db_path: &Path) -> Result<(), CliError> {
    let normalized_id = normalize_entry_identifier(id)?;
    let db = open_database(db_path)?;
    let repo = SqliteEntryRepository::new(db.connection());
    let mut entry = resolve_entry(&normalized_id, &repo)?;

    let edited_body = capture_editor_input_with_initial(&entry.body)?.unwrap_or_default();
    if edited_body == entry.body {
        println!("{}", entry.id);
        return Ok(());
    }

    entry.body = edited_body;
    entry.touch();
    repo.upsert(&entry)?;

    println!("{}", entry.id);
    Ok(())
}
