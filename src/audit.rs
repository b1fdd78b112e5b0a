//! Deletion audit log
//!
//! An explicitly constructed, explicitly injected sink: created at process
//! start, one record per deletion attempt, success or failure. Two
//! layouts ship: plain text and NDJSON.

use std::io::Write;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::models::{DeleteOptions, ProjectName};

/// One deletion attempt
#[derive(Debug, Clone)]
pub struct DeleteRecord {
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub project: String,
    pub options: DeleteOptions,
    /// `None` on success, the error message otherwise
    pub error: Option<String>,
}

impl DeleteRecord {
    pub fn new(
        timestamp: DateTime<Utc>,
        user: &str,
        project: &ProjectName,
        options: DeleteOptions,
        error: Option<String>,
    ) -> Self {
        Self {
            timestamp,
            user: user.to_string(),
            project: project.to_string(),
            options,
            error,
        }
    }
}

/// Audit sink for deletion attempts
pub trait DeleteLog: Send + Sync {
    fn on_delete(&self, record: &DeleteRecord);
}

/// Sink that drops records (tests, embedders with their own audit trail)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDeleteLog;

impl DeleteLog for NoopDeleteLog {
    fn on_delete(&self, _record: &DeleteRecord) {}
}

/// Plain-text layout, one line per attempt
pub struct TextDeleteLog<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> TextDeleteLog<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }
}

impl<W: Write + Send> DeleteLog for TextDeleteLog<W> {
    fn on_delete(&self, record: &DeleteRecord) {
        let status = match &record.error {
            None => "OK".to_string(),
            Some(e) => format!("FAILED: {e}"),
        };
        let mut out = self.out.lock().unwrap();
        let _ = writeln!(
            out,
            "[{}] {} DELETE {} force={} preserve={} {}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S%.3f %z"),
            record.user,
            record.project,
            record.options.force,
            record.options.preserve,
            status,
        );
    }
}

/// NDJSON layout, one object per attempt
pub struct JsonDeleteLog<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonDeleteLog<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }
}

impl<W: Write + Send> DeleteLog for JsonDeleteLog<W> {
    fn on_delete(&self, record: &DeleteRecord) {
        let line = serde_json::json!({
            "timestamp": record.timestamp.to_rfc3339(),
            "user": record.user,
            "project": record.project,
            "force": record.options.force,
            "preserve": record.options.preserve,
            "status": if record.error.is_none() { "ok" } else { "failed" },
            "error": record.error,
        });
        let mut out = self.out.lock().unwrap();
        let _ = writeln!(out, "{line}");
    }
}
