//! Bidirectional entry sync.
//!
//! The reconciler compares the local store's full listing against the remote
//! entries folder and applies a last-write-wins merge per entry id, using
//! `updated_at` (compared as epoch milliseconds) as the sole authority.
//! Entries present on only one side are copied to the other; nothing is ever
//! deleted by sync. Per-id failures are isolated: they are recorded on the
//! report and the pass continues, with no rollback and no retry.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, error, warn};

use crate::codec;
use crate::db::EntryRepository;
use crate::error::Result;
use crate::models::{Entry, EntryId};
use crate::remote::RemoteStore;
use crate::state::SyncState;

/// Minimum pause between completed sync runs unless forced.
pub const MIN_SYNC_INTERVAL: Duration = Duration::from_secs(30);

static UNSAFE_STEM_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("Invalid regex"));

/// One failed per-id operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncIssue {
    /// Entry id the failure belongs to
    pub id: String,
    /// Human-readable failure description
    pub message: String,
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Entries that existed only locally and were written to the remote
    pub pushed: usize,
    /// Entries that existed only remotely and were written to the local store
    pub pulled: usize,
    /// Entries present on both sides where the later timestamp overwrote
    pub updated: usize,
    /// Entries with equal timestamps on both sides (already in sync)
    pub skipped: usize,
    /// Per-id failures; partial progress is retained
    pub errors: Vec<SyncIssue>,
}

impl SyncReport {
    /// Number of failed per-id operations
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// True when no per-id operation failed
    #[must_use]
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    fn record(&mut self, id: &EntryId, error: &crate::Error) {
        warn!(id = %id, %error, "sync operation failed");
        self.errors.push(SyncIssue {
            id: id.to_string(),
            message: error.to_string(),
        });
    }
}

/// Remote file path for an entry, keyed by its id.
///
/// The stem is the sanitized id, never the entry date: date-keyed paths
/// collide when two entries share a day.
#[must_use]
pub fn remote_entry_path(folder: &str, id: &EntryId) -> String {
    let stem = UNSAFE_STEM_CHARS.replace_all(id.as_str(), "-");
    format!("{}/{stem}.md", folder.trim_end_matches('/'))
}

/// Reconciles the local store against a remote entries folder.
pub struct Reconciler<'a, R: RemoteStore> {
    local: &'a dyn EntryRepository,
    remote: &'a R,
    folder: String,
}

impl<'a, R: RemoteStore> Reconciler<'a, R> {
    pub fn new(local: &'a dyn EntryRepository, remote: &'a R, folder: impl Into<String>) -> Self {
        Self {
            local,
            remote,
            folder: folder.into(),
        }
    }

    /// Run one full reconciliation pass.
    ///
    /// Never returns `Err`: a fatal failure outside the per-id loop is
    /// reported as a single synthetic issue on the report.
    pub async fn run(&self) -> SyncReport {
        let mut report = SyncReport::default();
        if let Err(fatal) = self.reconcile(&mut report).await {
            error!(error = %fatal, "sync pass aborted");
            report.errors.push(SyncIssue {
                id: "(sync)".to_string(),
                message: fatal.to_string(),
            });
        }
        report
    }

    async fn reconcile(&self, report: &mut SyncReport) -> Result<()> {
        let local: BTreeMap<EntryId, Entry> = self
            .local
            .list_all()?
            .into_iter()
            .map(|entry| (entry.id.clone(), entry))
            .collect();
        let remote = self.fetch_remote_entries().await?;

        let ids: BTreeSet<EntryId> = local.keys().chain(remote.keys()).cloned().collect();
        debug!(
            local = local.len(),
            remote = remote.len(),
            union = ids.len(),
            "starting reconciliation pass"
        );

        for id in &ids {
            match (local.get(id), remote.get(id)) {
                (Some(ours), None) => match self.push(ours).await {
                    Ok(()) => report.pushed += 1,
                    Err(error) => report.record(id, &error),
                },
                (None, Some(theirs)) => match self.pull(theirs) {
                    Ok(()) => report.pulled += 1,
                    Err(error) => report.record(id, &error),
                },
                (Some(ours), Some(theirs)) => {
                    let ordering = match (ours.updated_at_millis(), theirs.updated_at_millis()) {
                        (Ok(ours_at), Ok(theirs_at)) => ours_at.cmp(&theirs_at),
                        (Err(error), _) | (_, Err(error)) => {
                            report.record(id, &error);
                            continue;
                        }
                    };
                    match ordering {
                        std::cmp::Ordering::Equal => report.skipped += 1,
                        std::cmp::Ordering::Greater => match self.push(ours).await {
                            Ok(()) => report.updated += 1,
                            Err(error) => report.record(id, &error),
                        },
                        std::cmp::Ordering::Less => match self.pull(theirs) {
                            Ok(()) => report.updated += 1,
                            Err(error) => report.record(id, &error),
                        },
                    }
                }
                (None, None) => unreachable!("id came from the union of both sides"),
            }
        }

        Ok(())
    }

    /// Scan the remote folder and decode every record, keyed by the id
    /// carried in its metadata. Undecodable records are skipped with a
    /// warning; they never fail the batch.
    async fn fetch_remote_entries(&self) -> Result<BTreeMap<EntryId, Entry>> {
        let mut entries = BTreeMap::new();

        for file in self.remote.list_entry_files().await? {
            let content = match self.remote.read_file(&file.path).await {
                Ok(content) => content,
                Err(error) => {
                    warn!(path = %file.path, %error, "skipping unreadable remote record");
                    continue;
                }
            };

            match codec::decode_entry(&content, file_stem(&file.path)) {
                Ok(mut entry) => {
                    entry.remote_path = Some(file.path.clone());
                    if let Some(previous) = entries.insert(entry.id.clone(), entry) {
                        warn!(
                            id = %previous.id,
                            path = %file.path,
                            "duplicate remote record for id, keeping the later file"
                        );
                    }
                }
                Err(error) => {
                    warn!(path = %file.path, %error, "skipping unparseable remote record");
                }
            }
        }

        Ok(entries)
    }

    /// Write the local entry to its id-keyed remote path, then record the
    /// path on the local copy.
    async fn push(&self, entry: &Entry) -> Result<()> {
        let path = remote_entry_path(&self.folder, &entry.id);
        // Existing file requires its current token on write; absence means create.
        let token = self.remote.update_token(&path).await?;
        let content = codec::encode_entry(entry);
        self.remote
            .write_file(&path, &content, token.as_deref())
            .await?;

        let mut synced = entry.clone();
        synced.remote_path = Some(path);
        self.local.upsert(&synced)?;
        Ok(())
    }

    /// Overwrite (or insert) the local entry with the remote version, verbatim.
    fn pull(&self, entry: &Entry) -> Result<()> {
        self.local.upsert(entry)?;
        Ok(())
    }
}

fn file_stem(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next()?;
    Some(name.strip_suffix(".md").unwrap_or(name))
}

/// Caller-side guard against overlapping or too-frequent sync runs.
///
/// There is no concurrent-invocation protection inside the reconciler itself;
/// callers hold one gate and consult it before starting a run. The last
/// completion time is epoch milliseconds so one-shot callers can persist it
/// between invocations.
#[derive(Debug)]
pub struct SyncGate {
    min_interval: Duration,
    state: SyncState,
    last_completed_at: Option<i64>,
}

impl Default for SyncGate {
    fn default() -> Self {
        Self::new(MIN_SYNC_INTERVAL)
    }
}

impl SyncGate {
    #[must_use]
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            state: SyncState::Idle,
            last_completed_at: None,
        }
    }

    /// Seed the gate with a persisted completion time (epoch millis).
    #[must_use]
    pub const fn with_last_completed_at(mut self, at: Option<i64>) -> Self {
        self.last_completed_at = at;
        self
    }

    /// When the last run completed, as epoch millis.
    #[must_use]
    pub const fn last_completed_at(&self) -> Option<i64> {
        self.last_completed_at
    }

    /// Current state, for status display.
    #[must_use]
    pub const fn state(&self) -> SyncState {
        self.state
    }

    /// Try to start a run. Refuses when one is already in progress, or when
    /// the last completed run is within the minimum interval unless `force`.
    pub fn begin(&mut self, force: bool) -> bool {
        if matches!(self.state, SyncState::Syncing) {
            return false;
        }
        if !force {
            if let Some(last) = self.last_completed_at {
                let elapsed = chrono::Utc::now().timestamp_millis().saturating_sub(last);
                if u128::try_from(elapsed).is_ok_and(|ms| ms < self.min_interval.as_millis()) {
                    return false;
                }
            }
        }
        self.state = SyncState::Syncing;
        true
    }

    /// Record completion of the current run.
    pub fn finish(&mut self, success: bool) {
        self.state = if success {
            SyncState::Synced
        } else {
            SyncState::Error
        };
        self.last_completed_at = Some(chrono::Utc::now().timestamp_millis());
    }
}
