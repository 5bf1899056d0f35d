//! Shared cross-interface state types.

/// Unified sync state surfaced by the status indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Syncing,
    Synced,
    Error,
}
