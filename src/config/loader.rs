//! Configuration loading and persistence

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::DeleteResult;

use super::types::Config;

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub message: String,
}

impl ConfigWarning {
    fn new(key: &str, file: &Path, message: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            file: file.to_path_buf(),
            message: message.into(),
        }
    }
}

/// Load configuration and collect non-fatal warnings (unknown keys,
/// malformed durations). Configuration problems never abort startup;
/// they degrade to defaults.
pub fn load_with_warnings(path: &Path) -> DeleteResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut warnings: Vec<ConfigWarning> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        warnings.push(ConfigWarning::new(
            &p.to_string(),
            path,
            "unknown configuration key",
        ));
    })
    .map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("invalid configuration in {}: {}", path.display(), e),
        )
    })?;

    check_durations(&config, path, &mut warnings);
    Ok((config, warnings))
}

/// Load from the given file, or fall back to defaults when it is missing
/// or unreadable. Environment overrides always apply.
pub fn load_or_default(path: &Path) -> (Config, Vec<ConfigWarning>) {
    let (config, warnings) = match load_with_warnings(path) {
        Ok(loaded) => loaded,
        Err(_) => (Config::default(), Vec::new()),
    };
    (with_env_overrides(config), warnings)
}

fn check_durations(config: &Config, path: &Path, warnings: &mut Vec<ConfigWarning>) {
    let checks = [
        (
            "archive.delete_archived_repos_after",
            &config.archive.delete_archived_repos_after,
        ),
        ("tasks.initial_delay", &config.tasks.initial_delay),
        ("tasks.interval", &config.tasks.interval),
    ];
    for (key, value) in checks {
        if parse_duration(value).is_none() {
            warnings.push(ConfigWarning::new(
                key,
                path,
                format!("malformed duration '{value}', using the default"),
            ));
        }
    }
}

/// Apply environment variable overrides (RECLAIM_* prefix)
pub fn with_env_overrides(mut config: Config) -> Config {
    if let Ok(val) = std::env::var("RECLAIM_ARCHIVE_ENABLED") {
        config.archive.enabled = val.to_lowercase() != "false" && val != "0";
    }

    if let Ok(folder) = std::env::var("RECLAIM_ARCHIVE_FOLDER") {
        if !folder.is_empty() {
            config.archive.folder = Some(PathBuf::from(folder));
        }
    }

    if let Ok(retention) = std::env::var("RECLAIM_RETENTION") {
        if parse_duration(&retention).is_some() {
            config.archive.delete_archived_repos_after = retention;
        }
    }

    config
}

/// Parse a duration string: `<n>` (seconds) or `<n><unit>` with units
/// `s`, `m`, `h`, `d`, `w`. Returns `None` on malformed input.
pub fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, unit) = value.split_at(split);
    let n: u64 = digits.parse().ok()?;
    let secs = match unit {
        "" | "s" => n,
        "m" => n.checked_mul(60)?,
        "h" => n.checked_mul(60 * 60)?,
        "d" => n.checked_mul(24 * 60 * 60)?,
        "w" => n.checked_mul(7 * 24 * 60 * 60)?,
        _ => return None,
    };
    Some(Duration::from_secs(secs))
}

/// Resolve the archive root: the configured folder if it exists or can be
/// created, otherwise the data directory. The data directory itself is
/// created when missing.
pub fn resolve_archive_folder(
    config: &Config,
    data_dir: &Path,
    warnings: &mut Vec<ConfigWarning>,
) -> PathBuf {
    if let Some(folder) = &config.archive.folder {
        match fs::create_dir_all(folder) {
            Ok(()) => return folder.clone(),
            Err(e) => {
                warnings.push(ConfigWarning {
                    key: "archive.folder".to_string(),
                    file: folder.clone(),
                    message: format!("cannot create archive folder: {e}, using the data directory"),
                });
            }
        }
    }
    if let Err(e) = fs::create_dir_all(data_dir) {
        eprintln!("warning: cannot create data directory {}: {e}", data_dir.display());
    }
    data_dir.to_path_buf()
}

/// Default data directory for archived repositories.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("reclaim")
}
