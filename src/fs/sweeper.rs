//! Trash folder sweeping
//!
//! A crash between rename and delete leaves a marked directory behind.
//! The sweeper scans the repository base paths for such leftovers and
//! removes them. Each run is time-boxed; an overrun aborts early and the
//! remainder is picked up by the next scheduled run.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::clock::Clock;
use crate::schedule::Task;

/// Marker grammars, oldest first:
/// - `<name>.<13-digit-epoch-millis>.deleted` (legacy, no suffix)
/// - `<name>.<13-digit-epoch-millis>.%marker%.git`
/// - `<name>.<14-digit-yyyyMMddHHmmss>.%marker%.git` (current)
///
/// The `%archived%` marker is accepted alongside `%deleted%` so a crashed
/// archive copy is reclaimed too. Only current code produces the 14-digit
/// form; the older forms are recognized for cleanup only.
fn trash_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"^.+\.\d{13}\.deleted$").expect("valid regex"),
            Regex::new(r"^.+\.\d{13}\.%(?:deleted|archived)%\.git$").expect("valid regex"),
            Regex::new(r"^.+\.\d{14}\.%(?:deleted|archived)%\.git$").expect("valid regex"),
        ]
    })
}

/// True if the directory name matches any trash-marker grammar.
pub fn is_trash_folder_name(name: &str) -> bool {
    trash_patterns().iter().any(|re| re.is_match(name))
}

/// Result of one sweep
#[derive(Debug, Default)]
pub struct SweepReport {
    pub deleted: Vec<PathBuf>,
    pub errors: Vec<String>,
    /// The wall-clock budget ran out before the scan finished
    pub timed_out: bool,
}

pub struct TrashSweeper {
    roots: Vec<PathBuf>,
    budget: Duration,
    clock: Arc<dyn Clock>,
}

impl TrashSweeper {
    pub fn new(roots: Vec<PathBuf>, budget: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            roots,
            budget,
            clock,
        }
    }

    /// Scan every configured root and delete matching trash folders.
    pub fn sweep(&self) -> SweepReport {
        let mut report = SweepReport::default();
        let started = self.clock.now();
        for root in &self.roots {
            if !root.is_dir() {
                continue;
            }
            if !self.sweep_dir(root, started, &mut report) {
                break;
            }
        }
        if report.timed_out {
            eprintln!(
                "warning: trash sweep aborted after exceeding its {}s budget, \
                 resuming on the next run",
                self.budget.as_secs()
            );
        }
        report
    }

    // Returns false once the budget is exhausted.
    fn sweep_dir(&self, dir: &Path, started: DateTime<Utc>, report: &mut SweepReport) -> bool {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                report
                    .errors
                    .push(format!("failed to scan {}: {e}", dir.display()));
                return true;
            }
        };
        for entry in entries.flatten() {
            if self.over_budget(started) {
                report.timed_out = true;
                return false;
            }
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if is_trash_folder_name(name) {
                // Losing a race against an in-flight deletion is fine;
                // gone already means swept.
                match std::fs::remove_dir_all(&path) {
                    Ok(()) => report.deleted.push(path),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => report
                        .errors
                        .push(format!("failed to delete {}: {e}", path.display())),
                }
            } else if !self.sweep_dir(&path, started, report) {
                return false;
            }
        }
        true
    }

    fn over_budget(&self, started: DateTime<Utc>) -> bool {
        let elapsed = self.clock.now() - started;
        match chrono::Duration::from_std(self.budget) {
            Ok(budget) => elapsed > budget,
            Err(_) => false,
        }
    }
}

impl Task for TrashSweeper {
    fn name(&self) -> &str {
        "trash-sweeper"
    }

    fn run(&mut self) {
        let report = self.sweep();
        for error in &report.errors {
            eprintln!("warning: trash sweep: {error}");
        }
    }
}
