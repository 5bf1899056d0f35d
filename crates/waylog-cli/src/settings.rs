//! Persistent CLI remote settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use waylog_core::remote::RemoteConfig;
use waylog_core::util::normalize_text_option;

const CONFIG_FILE_NAME: &str = "cli-config.json";

/// Environment variables consulted for the API token, in order.
const TOKEN_ENV_VARS: [&str; 2] = ["WAYLOG_GITHUB_TOKEN", "GITHUB_TOKEN"];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliSettings {
    #[serde(default = "default_settings_version")]
    pub version: u32,
    #[serde(default)]
    pub remote: RemoteSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteSettings {
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub folder: Option<String>,
    /// Stored token; environment variables take precedence.
    #[serde(default)]
    pub token: Option<String>,
}

const fn default_settings_version() -> u32 {
    1
}

pub fn default_settings_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("waylog").join(CONFIG_FILE_NAME))
}

impl CliSettings {
    pub fn load() -> Result<Self, String> {
        match default_settings_path() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut settings = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        settings.normalize();
        Ok(settings)
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = default_settings_path()
            .ok_or_else(|| "Failed to resolve CLI config directory".to_string())?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    /// Resolve a usable remote config, or `None` when the remote is not
    /// configured. Sync treats `None` as a friendly no-op.
    #[must_use]
    pub fn resolve_remote_config(&self) -> Option<RemoteConfig> {
        let token = resolve_token_from_env().or_else(|| self.remote.token.clone());
        RemoteConfig::from_parts(
            self.remote.owner.clone(),
            self.remote.repo.clone(),
            self.remote.branch.clone(),
            token,
            self.remote.folder.clone(),
        )
    }

    fn normalize(&mut self) {
        self.remote.owner = normalize_text_option(self.remote.owner.clone());
        self.remote.repo = normalize_text_option(self.remote.repo.clone());
        self.remote.branch = normalize_text_option(self.remote.branch.clone());
        self.remote.folder = normalize_text_option(self.remote.folder.clone());
        self.remote.token = normalize_text_option(self.remote.token.clone());
    }
}

fn resolve_token_from_env() -> Option<String> {
    TOKEN_ENV_VARS
        .iter()
        .find_map(|name| normalize_text_option(std::env::var(name).ok()))
}
