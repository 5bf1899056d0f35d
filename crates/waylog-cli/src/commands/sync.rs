use std::path::Path;

use waylog_core::db::{SqliteEntryRepository, SqliteSettingsRepository};
use waylog_core::remote::GithubRemote;
use waylog_core::sync::{Reconciler, SyncGate, SyncReport};

use crate::commands::common::open_database;
use crate::error::CliError;
use crate::settings::CliSettings;

pub async fn run_sync(force: bool, db_path: &Path) -> Result<(), CliError> {
    let settings = CliSettings::load().map_err(CliError::Config)?;
    let Some(remote_config) = settings.resolve_remote_config() else {
        // Unconfigured remote is a recoverable condition, not an error.
        println!(
            "Sync is not configured. Run `waylog config init` and set \
             WAYLOG_GITHUB_TOKEN (or GITHUB_TOKEN)."
        );
        return Ok(());
    };

    let db = open_database(db_path)?;
    let entries = SqliteEntryRepository::new(db.connection());
    let sync_settings = SqliteSettingsRepository::new(db.connection());

    let mut gate =
        SyncGate::default().with_last_completed_at(sync_settings.last_sync_completed_at()?);
    if !gate.begin(force) {
        println!("Synced recently; pass --force to run anyway.");
        return Ok(());
    }

    let folder = remote_config.folder.clone();
    let remote = GithubRemote::new(remote_config)?;
    let report = Reconciler::new(&entries, &remote, folder).run().await;

    gate.finish(report.success());
    if let Some(at) = gate.last_completed_at() {
        sync_settings.set_last_sync_completed_at(at)?;
    }

    print_report(&report);
    if report.success() {
        Ok(())
    } else {
        Err(CliError::SyncFailed(report.error_count()))
    }
}

fn print_report(report: &SyncReport) {
    println!(
        "Sync finished: {} pushed, {} pulled, {} updated, {} in sync",
        report.pushed, report.pulled, report.updated, report.skipped
    );
    for issue in &report.errors {
        eprintln!("  failed {}: {}", issue.id, issue.message);
    }
}
