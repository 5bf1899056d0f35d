use std::path::Path;

use waylog_core::db::{EntryRepository, SqliteEntryRepository};
use waylog_core::Entry;

use crate::commands::common::{
    entry_to_list_item, format_entry_lines, open_database, EntryListItem,
};
use crate::error::CliError;

pub fn run_list(
    limit: usize,
    include_archived: bool,
    as_json: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let repo = SqliteEntryRepository::new(db.connection());

    let entries: Vec<Entry> = if include_archived {
        repo.list_all()?.into_iter().take(limit).collect()
    } else {
        repo.list(limit, 0)?
    };

    if as_json {
        let json_items = entries
            .iter()
            .map(entry_to_list_item)
            .collect::<Vec<EntryListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if entries.is_empty() {
        println!("No entries yet. Start with `waylog add`.");
    } else {
        for line in format_entry_lines(&entries) {
            println!("{line}");
        }
    }

    Ok(())
}
