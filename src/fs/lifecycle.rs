//! Repository removal and archival
//!
//! The atomic rename of the live directory to its trash-marked name is the
//! crash-safety boundary: once renamed, no caller can observe a
//! half-deleted repository under its original name, and everything after
//! the rename is best-effort. Residual marked directories are reclaimed
//! later by the trash sweeper.

use std::io;
use std::path::{Path, PathBuf};

use crate::clock::Clock;
use crate::error::{DeleteError, DeleteResult};
use crate::events::ListenerSet;
use crate::models::ProjectName;
use crate::store::{GitError, GitStore};

/// Fixed-width UTC timestamp embedded in trash-marker names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

pub struct RepositoryRemover<'a> {
    git: &'a dyn GitStore,
    clock: &'a dyn Clock,
    listeners: &'a ListenerSet,
    archive_root: Option<PathBuf>,
}

impl<'a> RepositoryRemover<'a> {
    pub fn new(git: &'a dyn GitStore, clock: &'a dyn Clock, listeners: &'a ListenerSet) -> Self {
        Self {
            git,
            clock,
            listeners,
            archive_root: None,
        }
    }

    /// Archive deleted repositories under `root` instead of discarding them.
    pub fn with_archive(mut self, root: impl Into<PathBuf>) -> Self {
        self.archive_root = Some(root.into());
        self
    }

    /// Remove the project's repository directory, or do nothing but close
    /// its handles when `preserve` is set.
    pub fn remove(&self, project: &ProjectName, preserve: bool) -> DeleteResult<()> {
        let repository = self.git.open(project).map_err(|e| match e {
            GitError::NotFound(name) => DeleteError::NotFound(name),
            GitError::Io(e) => DeleteError::Io(e),
        })?;
        // Open handles must not outlive the rename.
        self.git.evict(project);
        if preserve {
            return Ok(());
        }

        let repo_path = repository.path().to_path_buf();
        let base = base_path(&repo_path, project)?;
        match &self.archive_root {
            Some(root) => self.archive_repository(project, &repo_path, &base, root),
            None => self.delete_repository(project, &repo_path, &base),
        }
    }

    fn delete_repository(
        &self,
        project: &ProjectName,
        repo_path: &Path,
        base: &Path,
    ) -> DeleteResult<()> {
        let trash = self.rename_repository(repo_path, base, project, "deleted")?;
        let cleanup: io::Result<()> = (|| {
            std::fs::remove_dir_all(&trash)?;
            prune_empty_ancestors(repo_path.parent(), base)
        })();
        if let Err(e) = cleanup {
            // Repo already renamed; the sweeper will reclaim what is left.
            eprintln!(
                "warning: error trying to delete {} or its parents: {e}",
                trash.display()
            );
        }
        self.listeners.notify_deleted(project);
        Ok(())
    }

    fn archive_repository(
        &self,
        project: &ProjectName,
        repo_path: &Path,
        base: &Path,
        archive_root: &Path,
    ) -> DeleteResult<()> {
        let marked = self.rename_repository(repo_path, base, project, "archived")?;
        let cleanup: io::Result<()> = (|| {
            let target = archive_target(archive_root, &marked, base);
            copy_dir_recursive(&marked, &target)?;
            std::fs::remove_dir_all(&marked)?;
            prune_empty_ancestors(repo_path.parent(), base)
        })();
        if let Err(e) = cleanup {
            // The marked directory stays behind rather than being deleted
            // un-backed-up; the sweeper reclaims it eventually.
            eprintln!("warning: error trying to archive {}: {e}", marked.display());
        }
        self.listeners.notify_deleted(project);
        Ok(())
    }

    fn rename_repository(
        &self,
        directory: &Path,
        base: &Path,
        project: &ProjectName,
        marker: &str,
    ) -> DeleteResult<PathBuf> {
        let stamp = self.clock.now().format(TIMESTAMP_FORMAT);
        let target = base.join(format!("{}.{stamp}.%{marker}%.git", project.as_str()));
        std::fs::rename(directory, &target)?;
        Ok(target)
    }
}

/// The store's base directory for a repository: the repository path minus
/// the project name's segments. Works for nested names mapped onto nested
/// directories.
pub fn base_path(repo_path: &Path, project: &ProjectName) -> DeleteResult<PathBuf> {
    let mut base = repo_path;
    for _ in 0..project.segment_count() {
        base = base.parent().ok_or_else(|| {
            DeleteError::Io(io::Error::other(format!(
                "repository path {} is shallower than project name {}",
                repo_path.display(),
                project
            )))
        })?;
    }
    Ok(base.to_path_buf())
}

/// Archive destination mirroring the marked directory's position below the
/// base path. If the nested parent cannot be created the copy degrades to
/// a flat name directly under the archive root.
fn archive_target(archive_root: &Path, marked: &Path, base: &Path) -> PathBuf {
    let relative = match marked.strip_prefix(base) {
        Ok(relative) => relative,
        Err(_) => return archive_root.join(marked.file_name().unwrap_or_default()),
    };
    let target = archive_root.join(relative);
    if let Some(parent) = target.parent() {
        if parent != archive_root && !parent.exists() && std::fs::create_dir_all(parent).is_err() {
            eprintln!(
                "warning: cannot create archive parent {}, archiving flat",
                parent.display()
            );
            return archive_root.join(marked.file_name().unwrap_or_default());
        }
    }
    target
}

/// Delete now-empty ancestors of a removed repository, walking upward from
/// its parent and stopping at the first non-empty directory or at the base
/// path itself. Sibling subtrees are never touched.
fn prune_empty_ancestors(start: Option<&Path>, base: &Path) -> io::Result<()> {
    let mut dir = match start {
        Some(dir) => dir,
        None => return Ok(()),
    };
    while dir != base {
        if std::fs::read_dir(dir)?.next().is_some() {
            break;
        }
        let parent = dir.parent();
        std::fs::remove_dir(dir)?;
        match parent {
            Some(parent) => dir = parent,
            None => break,
        }
    }
    Ok(())
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.path().is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
