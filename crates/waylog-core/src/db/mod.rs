//! Local store for Waylog

mod connection;
mod migrations;
mod repository;
mod settings_repository;

pub use connection::Database;
pub use repository::{EntryRepository, SqliteEntryRepository};
pub use settings_repository::{SettingsRepository, SqliteSettingsRepository};
