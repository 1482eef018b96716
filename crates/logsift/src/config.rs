//! Sweep configuration and path resolution.
//!
//! Targets, access-class host roots, and tuning knobs live in one TOML
//! document. Paths default to subdirectories of `~/.logsift`; set
//! `LOGSIFT_HOME` to relocate everything at once.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::sweep::{AccessRegistry, ScanTarget, DEFAULT_SUPPRESSED_MARKERS};

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Tuning knobs for a sweep.
///
/// Defaults preserve the long-standing behavior of the production batch:
/// 15 copy attempts 10 seconds apart, a pool of 5 concurrent targets, and a
/// 3 second progress interval.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepSettings {
    pub copy_attempts: u32,
    pub copy_retry_delay_secs: u64,
    pub max_concurrent_targets: usize,
    pub poll_interval_secs: u64,
    /// Character that rotated log file names carry and the live log does not.
    pub rotation_marker: char,
    /// Literal line markers that disqualify an otherwise matching line.
    pub suppressed_markers: Vec<String>,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            copy_attempts: 15,
            copy_retry_delay_secs: 10,
            max_concurrent_targets: 5,
            poll_interval_secs: 3,
            rotation_marker: '_',
            suppressed_markers: DEFAULT_SUPPRESSED_MARKERS
                .iter()
                .map(|marker| marker.to_string())
                .collect(),
        }
    }
}

impl SweepSettings {
    pub fn copy_retry_delay(&self) -> Duration {
        Duration::from_secs(self.copy_retry_delay_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Root of the sweep configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SweepConfig {
    #[serde(default)]
    pub settings: SweepSettings,
    #[serde(default)]
    pub access_classes: AccessRegistry,
    #[serde(default)]
    pub targets: Vec<ScanTarget>,
}

impl SweepConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Targets declared for one environment, in declaration order.
    pub fn targets_for(&self, environment: &str) -> Vec<ScanTarget> {
        self.targets
            .iter()
            .filter(|target| target.environment == environment)
            .cloned()
            .collect()
    }
}

/// Get the Logsift home directory: ~/.logsift
pub fn logsift_home() -> PathBuf {
    if let Ok(override_path) = std::env::var("LOGSIFT_HOME") {
        return PathBuf::from(override_path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".logsift")
}

/// Default config file path: ~/.logsift/config.toml
pub fn default_config_path() -> PathBuf {
    logsift_home().join("config.toml")
}

/// Staging area for remote copies: ~/.logsift/work
pub fn work_dir() -> PathBuf {
    logsift_home().join("work")
}

/// Where CSV reports land: ~/.logsift/reports
pub fn reports_dir() -> PathBuf {
    logsift_home().join("reports")
}

/// Get the logs directory: ~/.logsift/logs
pub fn logs_dir() -> PathBuf {
    logsift_home().join("logs")
}

/// Ensure the logs directory exists.
pub fn ensure_logs_dir() -> std::io::Result<PathBuf> {
    let dir = logs_dir();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
