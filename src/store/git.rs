//! Git storage port
//!
//! A repository handle must be closed and evicted from the process-wide
//! handle cache before its directory is renamed; open handles outliving
//! the rename cause "file in use" failures on some platforms.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::ProjectName;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("repository not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An open repository handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    name: ProjectName,
    path: PathBuf,
}

impl Repository {
    pub fn new(name: ProjectName, path: PathBuf) -> Self {
        Self { name, path }
    }

    pub fn name(&self) -> &ProjectName {
        &self.name
    }

    /// Absolute path of the repository directory on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Access to on-disk repository storage
pub trait GitStore: Send + Sync {
    /// Open a handle to the named repository.
    fn open(&self, name: &ProjectName) -> Result<Repository, GitError>;

    /// Branch refs of the repository (short names under the heads namespace).
    fn branches(&self, name: &ProjectName) -> Result<Vec<String>, GitError>;

    /// Tag refs of the repository.
    fn tags(&self, name: &ProjectName) -> Result<Vec<String>, GitError>;

    /// Close and drop any cached handle for the repository.
    fn evict(&self, name: &ProjectName);

    /// Base directories under which repositories live.
    fn base_paths(&self) -> Vec<PathBuf>;
}
