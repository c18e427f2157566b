//! Configuration handling for Tally
//!
//! Configuration is stored in `~/.config/tally/config.toml` (or the
//! platform equivalent) unless a path is given explicitly.
//!
//! ```toml
//! data_dir = "/home/me/.local/share/tally"
//! storage_key = "fg_task_manager_v1"
//!
//! [share]
//! api_base_url = "https://fgc-todo-sharing.nextround.workers.dev"
//! app_base_url = "https://fgc-todo-sharing.nextround.workers.dev"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::store::STORAGE_KEY;

/// Default base URL of the sharing service and its web app
pub const DEFAULT_SHARE_BASE_URL: &str = "https://fgc-todo-sharing.nextround.workers.dev";

/// Environment variable overriding the sharing API base URL
pub const SHARE_API_ENV: &str = "TALLY_SHARE_API_BASE_URL";

/// Environment variable overriding the sharing web app base URL
pub const SHARE_APP_ENV: &str = "TALLY_SHARE_APP_BASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Settings for the remote sharing service
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ShareConfig {
    /// Base URL of the sharing API
    pub api_base_url: Option<String>,

    /// Base URL of the sharing web app (publish/search pages)
    pub app_base_url: Option<String>,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory holding stored documents
    pub data_dir: Option<PathBuf>,

    /// Key the document is stored under
    pub storage_key: String,

    /// Sharing service settings
    pub share: ShareConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: STORAGE_KEY.to_string(),
            share: ShareConfig::default(),
        }
    }
}

/// Returns the first non-blank candidate, trimmed and without a trailing
/// slash, or the default base URL
pub fn resolve_base_url(candidates: &[Option<&str>]) -> String {
    candidates
        .iter()
        .flatten()
        .map(|candidate| candidate.trim())
        .find(|candidate| !candidate.is_empty())
        .map(|candidate| candidate.strip_suffix('/').unwrap_or(candidate).to_string())
        .unwrap_or_else(|| DEFAULT_SHARE_BASE_URL.to_string())
}

impl Config {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "tally")
    }

    /// Default configuration file location
    pub fn default_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads configuration from `path`, or from the default location
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = Self::parse(&content)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses configuration text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".to_string()));
        }
        if self
            .storage_key
            .contains(|c: char| c == '/' || c == '\\')
        {
            return Err(ConfigError::Invalid(format!(
                "storage_key must not contain path separators: '{}'",
                self.storage_key
            )));
        }
        Ok(())
    }

    /// Directory holding stored documents
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| ConfigError::Invalid("could not determine a data directory".to_string()).into())
    }

    /// Sharing API base URL (environment, then file, then default)
    pub fn share_api_base_url(&self) -> String {
        let env = std::env::var(SHARE_API_ENV).ok();
        resolve_base_url(&[env.as_deref(), self.share.api_base_url.as_deref()])
    }

    /// Sharing web app base URL (environment, then file, then default)
    pub fn share_app_base_url(&self) -> String {
        let env = std::env::var(SHARE_APP_ENV).ok();
        resolve_base_url(&[env.as_deref(), self.share.app_base_url.as_deref()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let config = Config::default();

        assert_eq!(config.storage_key, STORAGE_KEY);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn parses_partial_file() {
        let config = Config::parse("[share]\napi_base_url = \"https://api.example.com/\"\n").unwrap();

        assert_eq!(config.storage_key, STORAGE_KEY);
        assert_eq!(
            config.share.api_base_url.as_deref(),
            Some("https://api.example.com/")
        );
    }

    #[test]
    fn rejects_blank_storage_key() {
        assert!(matches!(
            Config::parse("storage_key = \"  \""),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            Config::parse("storage_key = "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "data_dir = \"/tmp/tally-data\"\nstorage_key = \"other\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.storage_key, "other");
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/tally-data"));
    }

    #[test]
    fn resolve_base_url_uses_default_when_missing() {
        assert_eq!(resolve_base_url(&[None, Some("   ")]), DEFAULT_SHARE_BASE_URL);
    }

    #[test]
    fn resolve_base_url_prefers_first_candidate() {
        assert_eq!(
            resolve_base_url(&[
                Some("https://runtime-config.example.com/"),
                Some("https://file.example.com"),
            ]),
            "https://runtime-config.example.com"
        );
    }

    #[test]
    fn resolve_base_url_trims() {
        assert_eq!(
            resolve_base_url(&[None, Some("  https://api.example.com/ ")]),
            "https://api.example.com"
        );
    }
}
