//! Waylog CLI - a travel journal that lives in your terminal
//!
//! Capture entries offline, then reconcile them with a Git-hosted
//! content folder via `waylog sync`.

mod cli;
mod commands;
mod error;
mod settings;

use std::env;
use std::path::PathBuf;

use clap::Parser;

use crate::cli::{Cli, Commands, ConfigCommands};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("waylog=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);

    match cli.command {
        Commands::Add {
            title,
            location,
            lon,
            lat,
            body,
        } => commands::add::run_add(&title, &location, lon, lat, &body, &db_path)?,
        Commands::List {
            limit,
            archived,
            json,
        } => commands::list::run_list(limit, archived, json, &db_path)?,
        Commands::Show { id } => commands::show::run_show(&id, &db_path)?,
        Commands::Edit { id } => commands::edit::run_edit(&id, &db_path)?,
        Commands::Publish { id } => commands::publish::run_publish(&id, &db_path)?,
        Commands::Archive { id } => commands::archive::run_archive(&id, &db_path)?,
        Commands::Delete { id } => commands::delete::run_delete(&id, &db_path)?,
        Commands::Sync { force } => commands::sync::run_sync(force, &db_path).await?,
        Commands::Config { command } => match command {
            ConfigCommands::Init {
                owner,
                repo,
                branch,
                folder,
                token,
            } => commands::config::run_config_init(&owner, &repo, branch, folder, token)?,
            ConfigCommands::Show => commands::config::run_config_show()?,
        },
        Commands::Completions { shell, output } => {
            commands::completions::run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}

fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("WAYLOG_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("waylog")
        .join("waylog.db")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use waylog_core::db::{Database, EntryRepository, SqliteEntryRepository};
    use waylog_core::Entry;

    use crate::cli::CompletionShell;
    use crate::commands::common::{
        format_entry_lines, normalize_entry_identifier, normalize_title, resolve_entry,
    };
    use crate::commands::completions::run_completions;
    use crate::commands::{archive, delete, publish};
    use crate::error::CliError;
    use crate::resolve_db_path;

    fn seeded_db(path: &std::path::Path, entries: &[Entry]) {
        let db = Database::open(path).unwrap();
        let repo = SqliteEntryRepository::new(db.connection());
        for entry in entries {
            repo.upsert(entry).unwrap();
        }
    }

    fn entry_with_id(id: &str, title: &str) -> Entry {
        let mut entry = Entry::new(title, "Lisbon", "");
        entry.id = id.parse().unwrap();
        entry
    }

    #[test]
    fn resolve_db_path_prefers_cli_argument() {
        let explicit = PathBuf::from("/tmp/waylog-test.db");
        assert_eq!(resolve_db_path(Some(explicit.clone())), explicit);
    }

    #[test]
    fn normalize_entry_identifier_rejects_empty() {
        assert!(matches!(
            normalize_entry_identifier(" \n "),
            Err(CliError::EmptyEntryId)
        ));
        assert_eq!(normalize_entry_identifier("  abc123  ").unwrap(), "abc123");
    }

    #[test]
    fn normalize_title_rejects_empty() {
        assert!(matches!(normalize_title("   "), Err(CliError::EmptyTitle)));
        assert_eq!(normalize_title(" Day one ").unwrap(), "Day one");
    }

    #[test]
    fn format_entry_lines_includes_status_markers() {
        let mut draft = Entry::new("First light", "Faro", "");
        draft.date = "2025-06-01".to_string();
        let mut published = Entry::new("Old town walk", "Porto", "");
        published.publish();
        published.date = "2025-06-02".to_string();
        let mut archived = Entry::new("Scrapped plan", "Braga", "");
        archived.archive();
        archived.date = "2025-06-03".to_string();

        let lines = format_entry_lines(&[draft, published, archived]);
        assert!(lines[0].ends_with("[draft]"));
        assert!(!lines[1].contains('['));
        assert!(lines[2].ends_with("[archived]"));
        assert!(lines.iter().all(|line| line.contains("2025-06-")));
    }

    #[test]
    fn resolve_entry_supports_exact_and_prefix_id() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteEntryRepository::new(db.connection());
        repo.upsert(&entry_with_id("11111111-1111-7111-8111-111111111111", "A"))
            .unwrap();
        repo.upsert(&entry_with_id("11111111-1111-7111-8111-222222222222", "B"))
            .unwrap();

        let by_exact = resolve_entry("11111111-1111-7111-8111-111111111111", &repo).unwrap();
        assert_eq!(by_exact.title, "A");

        let by_prefix = resolve_entry("11111111-1111-7111-8111-2", &repo).unwrap();
        assert_eq!(by_prefix.title, "B");
    }

    #[test]
    fn resolve_entry_rejects_ambiguous_prefix() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteEntryRepository::new(db.connection());
        repo.upsert(&entry_with_id("aaaaaaaa-aaaa-7aaa-8aaa-aaaaaaaaaaaa", "L"))
            .unwrap();
        repo.upsert(&entry_with_id("aaaaaaaa-aaaa-7aaa-8aaa-bbbbbbbbbbbb", "R"))
            .unwrap();

        let error = resolve_entry("aaaaaaaa-aaaa-7aaa-8aaa", &repo).unwrap_err();
        assert!(matches!(error, CliError::AmbiguousEntryId(_)));
    }

    #[test]
    fn resolve_entry_rejects_missing_entry() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteEntryRepository::new(db.connection());

        let error = resolve_entry("does-not-exist", &repo).unwrap_err();
        assert!(matches!(error, CliError::EntryNotFound(_)));
    }

    #[test]
    fn run_publish_clears_draft_flag() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("waylog.db");
        let entry = entry_with_id("cccccccc-cccc-7ccc-8ccc-111111111111", "Draft day");
        seeded_db(&db_path, &[entry.clone()]);

        publish::run_publish("cccccccc", &db_path).unwrap();

        let db = Database::open(&db_path).unwrap();
        let repo = SqliteEntryRepository::new(db.connection());
        let fetched = repo.get(&entry.id).unwrap().unwrap();
        assert!(!fetched.draft);
        assert!(fetched.updated_at >= entry.updated_at);
    }

    #[test]
    fn run_archive_soft_deletes_entry() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("waylog.db");
        let entry = entry_with_id("dddddddd-dddd-7ddd-8ddd-111111111111", "Done with this");
        seeded_db(&db_path, &[entry.clone()]);

        archive::run_archive("dddddddd", &db_path).unwrap();

        let db = Database::open(&db_path).unwrap();
        let repo = SqliteEntryRepository::new(db.connection());
        let fetched = repo.get(&entry.id).unwrap().unwrap();
        assert!(fetched.archived);
        assert!(fetched.archived_at.is_some());
    }

    #[test]
    fn run_delete_removes_local_only_entry() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("waylog.db");
        let entry = entry_with_id("eeeeeeee-eeee-7eee-8eee-111111111111", "Never pushed");
        seeded_db(&db_path, &[entry.clone()]);

        delete::run_delete("eeeeeeee", &db_path).unwrap();

        let db = Database::open(&db_path).unwrap();
        let repo = SqliteEntryRepository::new(db.connection());
        assert!(repo.get(&entry.id).unwrap().is_none());
    }

    #[test]
    fn run_delete_refuses_pushed_entry() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("waylog.db");
        let mut entry = entry_with_id("ffffffff-ffff-7fff-8fff-111111111111", "On the remote");
        entry.remote_path = Some("entries/ffffffff.md".to_string());
        seeded_db(&db_path, &[entry.clone()]);

        let error = delete::run_delete("ffffffff", &db_path).unwrap_err();
        assert!(matches!(error, CliError::DeletePushedEntry(_)));

        let db = Database::open(&db_path).unwrap();
        let repo = SqliteEntryRepository::new(db.connection());
        assert!(repo.get(&entry.id).unwrap().is_some());
    }

    #[test]
    fn run_delete_unknown_entry_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("waylog.db");
        seeded_db(&db_path, &[]);

        let error = delete::run_delete("no-such-id", &db_path).unwrap_err();
        assert!(matches!(error, CliError::EntryNotFound(_)));
    }

    #[test]
    fn run_completions_writes_bash_script_file() {
        let dir = tempfile::tempdir().unwrap();
        let output_path = dir.path().join("waylog.bash");

        run_completions(CompletionShell::Bash, Some(&output_path)).unwrap();

        let script = std::fs::read_to_string(&output_path).unwrap();
        assert!(script.contains("_waylog()"));
        assert!(script.contains("complete -F _waylog"));
    }
}
