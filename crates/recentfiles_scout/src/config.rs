//! Configuration for the Scout system

use crate::error::{Result, ScoutError};
use crate::filter::DEFAULT_SYSTEM_FOLDER;
use crate::types::ScanRequest;
use chrono::{Duration as ChronoDuration, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Engine tuning for scan sessions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Minimum time between two batch deliveries
    pub flush_interval: Duration,
    /// Whether symlinked directories are descended (no cycle guard).
    /// Symlinked files are always listed.
    pub follow_symlinks: bool,
    /// Subtree below the root that `skip_system_folder` excludes
    pub system_folder: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            flush_interval: Duration::from_secs(1),
            follow_symlinks: false,
            system_folder: DEFAULT_SYSTEM_FOLDER.to_string(),
        }
    }
}

/// User defaults, stored as TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentConfig {
    /// Directory scanned when none is given
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// File name glob
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Exclude `root/<system_folder>`
    #[serde(default = "default_skip_system_folder")]
    pub skip_system_folder: bool,

    /// Name of the excluded subtree
    #[serde(default = "default_system_folder")]
    pub system_folder: String,

    /// Only files modified in the last N days; 0 disables the lower bound
    #[serde(default = "default_days_back")]
    pub days_back: u32,

    /// Batch delivery interval in milliseconds
    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,

    #[serde(default)]
    pub follow_symlinks: bool,
}

fn default_root() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_pattern() -> String {
    "*.*".to_string()
}

fn default_skip_system_folder() -> bool {
    true
}

fn default_system_folder() -> String {
    DEFAULT_SYSTEM_FOLDER.to_string()
}

fn default_days_back() -> u32 {
    7
}

fn default_flush_interval_ms() -> u64 {
    1000
}

impl Default for RecentConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            pattern: default_pattern(),
            skip_system_folder: default_skip_system_folder(),
            system_folder: default_system_folder(),
            days_back: default_days_back(),
            flush_interval_ms: default_flush_interval_ms(),
            follow_symlinks: false,
        }
    }
}

impl RecentConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RecentConfig =
            toml::from_str(&content).map_err(|e| ScoutError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ScoutError::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            flush_interval: Duration::from_millis(self.flush_interval_ms),
            follow_symlinks: self.follow_symlinks,
            system_folder: self.system_folder.clone(),
        }
    }

    /// Request built from these defaults, with `date_from` relative to now
    pub fn default_request(&self) -> ScanRequest {
        let date_from = (self.days_back > 0)
            .then(|| Local::now() - ChronoDuration::days(i64::from(self.days_back)));
        ScanRequest::new(self.root.clone())
            .with_pattern(self.pattern.clone())
            .skip_system_folder(self.skip_system_folder)
            .modified_between(date_from, None)
    }
}
