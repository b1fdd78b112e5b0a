//! Configuration module
//!
//! Keys, defaults, and fallback behavior:
//! - malformed durations and unreadable archive folders degrade to
//!   documented defaults with a warning, never a startup failure
//! - unknown keys are reported as warnings
//! - RECLAIM_* environment variables override the file

mod loader;
#[cfg(test)]
mod tests;
mod types;

pub use loader::{
    default_data_dir, load_or_default, load_with_warnings, parse_duration,
    resolve_archive_folder, with_env_overrides, ConfigWarning,
};
pub use types::{
    ArchiveConfig, Config, DeletionConfig, SweepConfig, TasksConfig, DEFAULT_INITIAL_DELAY,
    DEFAULT_INTERVAL, DEFAULT_RETENTION,
};
