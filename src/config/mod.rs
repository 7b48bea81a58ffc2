//! Configuration module
//!
//! A single YAML document at `<data root>/config.yaml`. Loaded once at
//! process start and passed by reference into commands; defaults are
//! written back the first time the file is found missing.
//!
//! The data root defaults to `~/.crst` and can be overridden with the
//! `CRST_HOME` environment variable.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_username")]
    pub username: String,

    /// Session UUID applied to entries recorded without an explicit one.
    #[serde(default)]
    pub current_session: Option<String>,

    #[serde(default = "default_datetime_format")]
    pub datetime_format: String,

    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: default_username(),
            current_session: None,
            datetime_format: default_datetime_format(),
            storage_dir: default_storage_dir(),
            ai: AiConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

fn default_username() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

fn default_datetime_format() -> String {
    crate::core::entry::TIMESTAMP_FORMAT.to_string()
}

fn default_storage_dir() -> PathBuf {
    data_root()
}

/// Ollama completion service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_ai_url")]
    pub url: String,

    #[serde(default = "default_ai_model")]
    pub model: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            url: default_ai_url(),
            model: default_ai_model(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_ai_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ai_model() -> String {
    "llama3.2:latest".to_string()
}

/// SearxNG search proxy settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_search_url")]
    pub url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            url: default_search_url(),
        }
    }
}

fn default_search_url() -> String {
    "http://localhost:4000".to_string()
}

impl Config {
    /// Load the configuration, establishing defaults on first run.
    pub fn load() -> Result<Self> {
        let root = data_root();
        let config_file = root.join("config.yaml");

        if !config_file.exists() {
            tracing::info!(path = %config_file.display(), "config file not found, creating default");
            let config = Self::default();
            config.save_to(&config_file)?;
            return Ok(config);
        }

        Self::load_from(&config_file)
    }

    /// Load config from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Save config to a file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {e}")))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("failed to create config dir: {e}")))?;
        }
        std::fs::write(path, content)
            .map_err(|e| Error::Config(format!("failed to write {}: {e}", path.display())))
    }
}

/// Resolve the data root: `CRST_HOME`, then `~/.crst`.
pub fn data_root() -> PathBuf {
    if let Ok(env_path) = std::env::var("CRST_HOME") {
        return PathBuf::from(env_path);
    }
    home_dir()
        .map(|h| h.join(".crst"))
        .unwrap_or_else(|| PathBuf::from(".crst"))
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_round_trip_through_yaml() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let parsed: Config = serde_yaml::from_str("username: carol\n").unwrap();
        assert_eq!(parsed.username, "carol");
        assert!(parsed.ai.enabled);
        assert_eq!(parsed.ai.url, "http://localhost:11434");
        assert_eq!(parsed.search.url, "http://localhost:4000");
    }

    #[test]
    fn test_save_and_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let mut config = Config::default();
        config.username = "dave".to_string();
        config.ai.enabled = false;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unparsable_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "username: [unterminated").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
