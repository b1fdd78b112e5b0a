//! Error types for reclaim
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use thiserror::Error;

use crate::store::StoreError;

/// Result type alias for deletion operations
pub type DeleteResult<T> = Result<T, DeleteError>;

/// Main error type for deletion operations
#[derive(Error, Debug)]
pub enum DeleteError {
    /// Caller does not hold a capability that permits the deletion
    #[error("not allowed to delete project")]
    Unauthorized,

    /// One or more precondition checks blocked the deletion
    #[error("cannot delete project '{project}': {}", .reasons.join("; "))]
    Conflict {
        project: String,
        reasons: Vec<String>,
    },

    /// Repository directory or project record is already absent
    #[error("project not found: {0}")]
    NotFound(String),

    /// Unexpected filesystem error, distinct from "already gone"
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure reported by an external store collaborator
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl DeleteError {
    /// Single-reason conflict, the common case outside the pipeline.
    pub fn conflict(project: impl Into<String>, reason: impl Into<String>) -> Self {
        DeleteError::Conflict {
            project: project.into(),
            reasons: vec![reason.into()],
        }
    }
}
