//! Archive retention
//!
//! Archived repository copies live under the archive root until their
//! last-modified time is older than the retention duration, then they are
//! reclaimed. Per-entry errors never stop the scan.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::schedule::Task;

/// Result of one reap
#[derive(Debug, Default)]
pub struct ReapReport {
    pub deleted: Vec<PathBuf>,
    pub errors: Vec<String>,
}

pub struct ArchiveReaper {
    archive_root: PathBuf,
    retention: Duration,
    clock: Arc<dyn Clock>,
}

impl ArchiveReaper {
    pub fn new(archive_root: impl Into<PathBuf>, retention: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            archive_root: archive_root.into(),
            retention,
            clock,
        }
    }

    /// Delete immediate children of the archive root that are past
    /// retention.
    pub fn reap(&self) -> ReapReport {
        let mut report = ReapReport::default();
        let entries = match std::fs::read_dir(&self.archive_root) {
            Ok(entries) => entries,
            Err(e) => {
                report.errors.push(format!(
                    "failed to scan archive {}: {e}",
                    self.archive_root.display()
                ));
                return report;
            }
        };
        let now = self.clock.now();
        for entry in entries.flatten() {
            let path = entry.path();
            match self.is_overdue(&path, now) {
                Ok(false) => {}
                Ok(true) => {
                    let removed = if path.is_dir() {
                        std::fs::remove_dir_all(&path)
                    } else {
                        std::fs::remove_file(&path)
                    };
                    match removed {
                        Ok(()) => report.deleted.push(path),
                        Err(e) => report
                            .errors
                            .push(format!("failed to delete {}: {e}", path.display())),
                    }
                }
                Err(e) => report.errors.push(format!(
                    "failed to read modification time of {}: {e}",
                    path.display()
                )),
            }
        }
        report
    }

    fn is_overdue(&self, path: &std::path::Path, now: DateTime<Utc>) -> std::io::Result<bool> {
        let modified: DateTime<Utc> = std::fs::metadata(path)?.modified()?.into();
        let age = now - modified;
        Ok(match chrono::Duration::from_std(self.retention) {
            Ok(retention) => age > retention,
            Err(_) => false,
        })
    }
}

impl Task for ArchiveReaper {
    fn name(&self) -> &str {
        "archive-reaper"
    }

    fn run(&mut self) {
        let report = self.reap();
        for error in &report.errors {
            eprintln!("warning: archive reap: {error}");
        }
    }
}
