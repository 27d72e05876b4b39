//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use scraper::Selector;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Status page and label extraction settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Poll cadence settings
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Snapshot persistence settings
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.source.url)?;
        Selector::parse(&self.source.item_selector)
            .map_err(|e| AppError::selector(&self.source.item_selector, format!("{e:?}")))?;

        if self.source.label_attr.trim().is_empty() {
            return Err(AppError::validation("source.label_attr is empty"));
        }
        if self.source.user_agent.trim().is_empty() {
            return Err(AppError::validation("source.user_agent is empty"));
        }
        if self.source.request_timeout_secs == 0 {
            return Err(AppError::validation(
                "source.request_timeout_secs must be > 0",
            ));
        }
        if self.source.wait_timeout_secs == 0 {
            return Err(AppError::validation("source.wait_timeout_secs must be > 0"));
        }
        if self.source.poll_interval_ms == 0 {
            return Err(AppError::validation("source.poll_interval_ms must be > 0"));
        }
        if self.monitor.interval_secs == 0 {
            return Err(AppError::validation("monitor.interval_secs must be > 0"));
        }
        if self.storage.snapshot_path.as_os_str().is_empty() {
            return Err(AppError::validation("storage.snapshot_path is empty"));
        }
        Ok(())
    }

    /// Resolve the snapshot path against the directory holding the config file.
    pub fn snapshot_path(&self, base_dir: &Path) -> PathBuf {
        if self.storage.snapshot_path.is_absolute() {
            self.storage.snapshot_path.clone()
        } else {
            base_dir.join(&self.storage.snapshot_path)
        }
    }
}

/// Status page fetching and label extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Status page URL
    #[serde(default = "defaults::url")]
    pub url: String,

    /// CSS selector matching one element per complaint
    #[serde(default = "defaults::item_selector")]
    pub item_selector: String,

    /// Attribute holding the complaint label
    #[serde(default = "defaults::label_attr")]
    pub label_attr: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::request_timeout")]
    pub request_timeout_secs: u64,

    /// Upper bound on waiting for the complaint list to appear
    #[serde(default = "defaults::wait_timeout")]
    pub wait_timeout_secs: u64,

    /// Delay between page checks while waiting
    #[serde(default = "defaults::poll_interval")]
    pub poll_interval_ms: u64,
}

impl SourceConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: defaults::url(),
            item_selector: defaults::item_selector(),
            label_attr: defaults::label_attr(),
            user_agent: defaults::user_agent(),
            request_timeout_secs: defaults::request_timeout(),
            wait_timeout_secs: defaults::wait_timeout(),
            poll_interval_ms: defaults::poll_interval(),
        }
    }
}

/// Poll cadence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Seconds to wait between cycles
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,

    /// Stop after this many cycles (runs forever when unset)
    #[serde(default)]
    pub max_cycles: Option<usize>,
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
            max_cycles: None,
        }
    }
}

/// Snapshot persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Snapshot file, relative to the config directory unless absolute
    #[serde(default = "defaults::snapshot_path")]
    pub snapshot_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_path: defaults::snapshot_path(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Source defaults
    pub fn url() -> String {
        "https://portal.311.nyc.gov/check-status/".into()
    }
    pub fn item_selector() -> String {
        ".entitypinmap-list-box-item".into()
    }
    pub fn label_attr() -> String {
        "aria-label".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; complaint-monitor/0.1)".into()
    }
    pub fn request_timeout() -> u64 {
        10
    }
    pub fn wait_timeout() -> u64 {
        20
    }
    pub fn poll_interval() -> u64 {
        1000
    }

    // Monitor defaults
    pub fn interval() -> u64 {
        600
    }

    // Storage defaults
    pub fn snapshot_path() -> PathBuf {
        PathBuf::from("data.json")
    }
}
