//! Configuration type definitions

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::loader::parse_duration;

/// Default archive retention when `delete_archived_repos_after` is unset
/// or malformed.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(180 * 24 * 60 * 60);

/// Default schedule for the background tasks: short initial delay, daily runs.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(60);
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub deletion: DeletionConfig,

    #[serde(default)]
    pub archive: ArchiveConfig,

    #[serde(default)]
    pub tasks: TasksConfig,

    #[serde(default)]
    pub sweep: SweepConfig,
}

/// Deletion policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionConfig {
    /// Parent project under which preserved projects are hidden
    #[serde(default = "default_deleted_parent")]
    pub parent_for_deleted_projects: String,

    /// Allow deleting repositories that carry tag refs
    #[serde(default = "default_true")]
    pub allow_deletion_of_repos_with_tags: bool,

    /// Convert to a hidden placeholder instead of deleting when preserving
    #[serde(default)]
    pub hide_project_on_preserve: bool,

    /// Expose the preserve option on the command surface
    #[serde(default = "default_true")]
    pub enable_preserve_option: bool,

    /// Regular expressions naming projects that must never be deleted
    #[serde(default)]
    pub protected_projects: Vec<String>,
}

impl Default for DeletionConfig {
    fn default() -> Self {
        Self {
            parent_for_deleted_projects: default_deleted_parent(),
            allow_deletion_of_repos_with_tags: true,
            hide_project_on_preserve: false,
            enable_preserve_option: true,
            protected_projects: Vec::new(),
        }
    }
}

fn default_deleted_parent() -> String {
    "Deleted-Projects".to_string()
}

/// Archive configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Copy deleted repositories into the archive instead of discarding them
    #[serde(default)]
    pub enabled: bool,

    /// Archive root; defaults to the data directory when unset
    #[serde(default)]
    pub folder: Option<PathBuf>,

    /// Retention duration, e.g. "180d", "26w", "12h"
    #[serde(default = "default_retention_str")]
    pub delete_archived_repos_after: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            folder: None,
            delete_archived_repos_after: default_retention_str(),
        }
    }
}

fn default_retention_str() -> String {
    "180d".to_string()
}

impl ArchiveConfig {
    /// Parsed retention, falling back to the default on malformed input.
    /// The loader has already warned about the malformed value.
    pub fn retention(&self) -> Duration {
        parse_duration(&self.delete_archived_repos_after).unwrap_or(DEFAULT_RETENTION)
    }
}

/// Shared schedule for the archive reaper and trash sweeper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Delay before the first run, e.g. "1m"
    #[serde(default = "default_initial_delay_str")]
    pub initial_delay: String,

    /// Interval between runs, e.g. "1d"
    #[serde(default = "default_interval_str")]
    pub interval: String,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            initial_delay: default_initial_delay_str(),
            interval: default_interval_str(),
        }
    }
}

fn default_initial_delay_str() -> String {
    "1m".to_string()
}

fn default_interval_str() -> String {
    "1d".to_string()
}

impl TasksConfig {
    pub fn initial_delay(&self) -> Duration {
        parse_duration(&self.initial_delay).unwrap_or(DEFAULT_INITIAL_DELAY)
    }

    pub fn interval(&self) -> Duration {
        parse_duration(&self.interval).unwrap_or(DEFAULT_INTERVAL)
    }
}

/// Trash sweeper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Wall-clock budget per sweep, in seconds
    #[serde(default = "default_sweep_budget_secs")]
    pub max_allowed_time: u64,

    /// Extra directory to scan in addition to the store's base paths
    #[serde(default)]
    pub trash_folder: Option<PathBuf>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            max_allowed_time: default_sweep_budget_secs(),
            trash_folder: None,
        }
    }
}

fn default_sweep_budget_secs() -> u64 {
    3600
}

impl SweepConfig {
    pub fn budget(&self) -> Duration {
        Duration::from_secs(self.max_allowed_time)
    }
}

fn default_true() -> bool {
    true
}
