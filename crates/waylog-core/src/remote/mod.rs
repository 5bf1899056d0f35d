//! Remote store abstraction.
//!
//! The remote store is a folder of entry records inside a Git-hosted content
//! repository. The reconciler only ever needs four operations, kept behind a
//! trait so sync logic can be exercised against an in-memory double.

mod github;

pub use github::GithubRemote;

use async_trait::async_trait;

use crate::error::Result;
use crate::util::normalize_text_option;

/// Connection settings for the remote content repository.
///
/// Constructed explicitly and passed around; there is no ambient singleton.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Target branch
    pub branch: String,
    /// API token
    pub token: String,
    /// Folder holding entry records, relative to the repository root
    pub folder: String,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RemoteConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("token", &"[REDACTED]")
            .field("folder", &self.folder)
            .finish()
    }
}

impl RemoteConfig {
    /// Build a config from optional parts.
    ///
    /// Returns `None` when any required part is missing or blank - the caller
    /// treats an unconfigured remote as a recoverable no-op, not an error.
    #[must_use]
    pub fn from_parts(
        owner: Option<String>,
        repo: Option<String>,
        branch: Option<String>,
        token: Option<String>,
        folder: Option<String>,
    ) -> Option<Self> {
        Some(Self {
            owner: normalize_text_option(owner)?,
            repo: normalize_text_option(repo)?,
            branch: normalize_text_option(branch).unwrap_or_else(|| "main".to_string()),
            token: normalize_text_option(token)?,
            folder: normalize_text_option(folder).unwrap_or_else(|| "entries".to_string()),
        })
    }
}

/// Reference to one file in the remote entries folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Path relative to the repository root
    pub path: String,
    /// Current blob sha, used as the write precondition
    pub sha: String,
}

/// Operations the reconciler needs from a remote store.
#[async_trait]
pub trait RemoteStore {
    /// List every file in the entries folder.
    ///
    /// A missing folder is treated as empty, not an error.
    async fn list_entry_files(&self) -> Result<Vec<RemoteFile>>;

    /// Read a file's text content.
    async fn read_file(&self, path: &str) -> Result<String>;

    /// Fetch the update token (blob sha) for a path.
    ///
    /// Returns `None` when no file exists at the path; absence is not an
    /// error, it means the write will be a create.
    async fn update_token(&self, path: &str) -> Result<Option<String>>;

    /// Write a file, creating it when `token` is `None` and overwriting the
    /// tokened revision otherwise. Returns the new update token.
    async fn write_file(&self, path: &str, content: &str, token: Option<&str>) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_requires_owner_repo_token() {
        assert!(RemoteConfig::from_parts(None, None, None, None, None).is_none());
        assert!(RemoteConfig::from_parts(
            Some("traveler".to_string()),
            Some("journal".to_string()),
            None,
            None,
            None,
        )
        .is_none());
    }

    #[test]
    fn from_parts_defaults_branch_and_folder() {
        let config = RemoteConfig::from_parts(
            Some("traveler".to_string()),
            Some("journal".to_string()),
            None,
            Some("token".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(config.branch, "main");
        assert_eq!(config.folder, "entries");
    }

    #[test]
    fn debug_redacts_token() {
        let config = RemoteConfig::from_parts(
            Some("traveler".to_string()),
            Some("journal".to_string()),
            Some("content".to_string()),
            Some("secret".to_string()),
            Some("entries".to_string()),
        )
        .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
