//! Configuration infrastructure
//!
//! Contains configuration loading for both scraping tools.
//!
//! Every section falls back to its defaults, so a config file only needs the
//! keys it changes. Command-line flags override values loaded here.

#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

pub use crate::infrastructure::parsing::config::ParsingConfig;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP client settings shared by both tools
    pub http: HttpConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Listing crawler settings
    pub crawler: CrawlerConfig,

    /// Profile fetcher settings
    pub profiles: ProfileConfig,

    /// CSS selectors and patterns used during extraction
    pub parsing: ParsingConfig,
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User agent sent on every request
    pub user_agent: String,

    /// Whole-request timeout in seconds
    pub timeout_seconds: u64,

    /// Connect timeout in seconds
    pub connect_timeout_seconds: u64,

    /// Whether to follow redirects
    pub follow_redirects: bool,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    /// Mirror log lines to stdout
    pub console_output: bool,

    /// Append log lines to `<log_dir>/<tool>.log`
    pub file_output: bool,

    /// Overrides the `logs` directory beside the executable
    pub log_dir: Option<PathBuf>,
}

/// Listing crawler settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// CSV path used when `--output` is not given
    pub default_output: PathBuf,
}

/// Profile fetcher settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// JSON path used when `--output` is not given
    pub default_output: PathBuf,

    /// Simultaneous requests used when `--concurrency` is not given
    pub concurrency: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::USER_AGENT.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            connect_timeout_seconds: defaults::CONNECT_TIMEOUT_SECONDS,
            follow_redirects: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            console_output: true,
            file_output: true,
            log_dir: None,
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            default_output: PathBuf::from(defaults::LISTING_OUTPUT),
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            default_output: PathBuf::from(defaults::PROFILES_OUTPUT),
            concurrency: defaults::PROFILE_CONCURRENCY,
        }
    }
}

/// Configuration manager for loading settings from disk
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join(defaults::APP_DIR_NAME);

        Ok(config_dir)
    }

    /// Manager for the per-user config file
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_dir()?.join(defaults::CONFIG_FILE_NAME);
        Ok(Self { config_path })
    }

    /// Manager for an explicit config file
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Resolve which config to use: an explicit path must load, the per-user
    /// file is optional.
    pub async fn resolve(explicit: Option<&Path>) -> Result<AppConfig> {
        match explicit {
            Some(path) => Self::with_path(path).load_required().await,
            None => match Self::new() {
                Ok(manager) => manager.load_config().await,
                Err(_) => Ok(AppConfig::default()),
            },
        }
    }

    /// Load configuration, falling back to defaults when the file is missing
    pub async fn load_config(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            info!("Configuration file not found, using defaults: {:?}", self.config_path);
            return Ok(AppConfig::default());
        }
        self.load_required().await
    }

    /// Load configuration; a missing or malformed file is an error
    pub async fn load_required(&self) -> Result<AppConfig> {
        let content = fs::read_to_string(&self.config_path)
            .await
            .with_context(|| format!("Failed to read configuration file {:?}", self.config_path))?;

        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid configuration file {:?}", self.config_path))?;

        info!("Loaded configuration from: {:?}", self.config_path);
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

/// Default values for configuration
pub mod defaults {
    /// Browser-like user agent; the site serves reduced markup to unknown agents
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    /// Default connect timeout in seconds
    pub const CONNECT_TIMEOUT_SECONDS: u64 = 10;

    pub const LOG_LEVEL: &str = "info";

    /// Default listing CSV
    pub const LISTING_OUTPUT: &str = "./data/cats/data.csv";

    /// Default profiles JSON
    pub const PROFILES_OUTPUT: &str = "./data/cats/adoption_profiles.json";

    /// Default number of simultaneous profile requests
    pub const PROFILE_CONCURRENCY: usize = 10;

    pub const APP_DIR_NAME: &str = "adoption-scraper";
    pub const CONFIG_FILE_NAME: &str = "config.json";
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.profiles.concurrency, 10);
        assert_eq!(config.crawler.default_output, PathBuf::from("./data/cats/data.csv"));
        assert!(config.http.user_agent.starts_with("Mozilla/5.0 (Windows NT 10.0"));
        assert!(config.http.user_agent.ends_with("Safari/537.36"));
        assert!(config.logging.console_output);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{ "profiles": { "concurrency": 4 }, "logging": { "level": "debug" } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.profiles.concurrency, 4);
        assert_eq!(
            config.profiles.default_output,
            PathBuf::from("./data/cats/adoption_profiles.json")
        );
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.file_output);
        assert_eq!(config.http.timeout_seconds, 30);
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("nested").join("config.json"));

        let mut config = AppConfig::default();
        config.http.timeout_seconds = 5;
        manager.save_config(&config).await.unwrap();

        let loaded = manager.load_required().await.unwrap();
        assert_eq!(loaded.http.timeout_seconds, 5);
    }

    #[tokio::test]
    async fn test_missing_file_uses_defaults_unless_required() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("absent.json"));

        let config = manager.load_config().await.unwrap();
        assert_eq!(config.profiles.concurrency, 10);
        assert!(manager.load_required().await.is_err());
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(ConfigManager::with_path(&path).load_config().await.is_err());
    }
}
