use std::path::Path;

use waylog_core::db::SqliteEntryRepository;

use crate::commands::common::{normalize_entry_identifier, open_database, resolve_entry};
use crate::error::CliError;

pub fn run_show(id: &str, db_path: &Path) -> Result<(), CliError> {
    let normalized_id = normalize_entry_identifier(id)?;
    let db = open_database(db_path)?;
    let repo = SqliteEntryRepository::new(db.connection());
    let entry = resolve_entry(&normalized_id, &repo)?;

    println!("id:        {}", entry.id);
    println!("title:     {}", entry.title);
    println!("location:  {}", entry.location);
    println!("date:      {}", entry.date);
    if let Some([lon, lat]) = entry.coordinates {
        println!("coords:    {lon}, {lat}");
    }
    println!("updated:   {}", entry.updated_at);
    println!(
        "status:    {}{}",
        if entry.draft { "draft" } else { "published" },
        if entry.archived { " (archived)" } else { "" }
    );
    if let Some(remote_path) = &entry.remote_path {
        println!("remote:    {remote_path}");
    }
    for url in &entry.media {
        println!("media:     {url}");
    }
    println!();
    println!("{}", entry.body);
    Ok(())
}
