//! Local git storage
//!
//! Bare repositories laid out as `<base>/<name>.git`, with nested names
//! mapped onto nested directories (`a/b/c` -> `<base>/a/b/c.git`). Refs
//! are read from the loose-ref namespaces; that is all the deletion
//! pipeline needs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::fs::is_trash_folder_name;
use crate::models::ProjectName;

use super::{GitError, GitStore, ProjectHierarchy, Repository, StoreError};

/// Git storage over a single local base directory
pub struct LocalGitStore {
    base: PathBuf,
    // Open-handle cache; handles must be evicted before a rename.
    handles: Mutex<HashMap<ProjectName, Repository>>,
}

impl LocalGitStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            handles: Mutex::new(HashMap::new()),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn repo_path(&self, name: &ProjectName) -> PathBuf {
        self.base.join(format!("{}.git", name.as_str()))
    }

    fn refs(&self, name: &ProjectName, namespace: &str) -> Result<Vec<String>, GitError> {
        let repo = self.open(name)?;
        let root = repo.path().join("refs").join(namespace);
        let mut refs = Vec::new();
        if root.is_dir() {
            collect_refs(&root, &root, &mut refs)?;
        }
        refs.sort();
        Ok(refs)
    }

    /// All live project names below the base path. Trash-marked
    /// directories are not projects.
    pub fn list_projects(&self) -> Result<Vec<ProjectName>, GitError> {
        let mut names = Vec::new();
        if self.base.is_dir() {
            collect_projects(&self.base, &self.base, &mut names)?;
        }
        names.sort();
        Ok(names)
    }
}

impl GitStore for LocalGitStore {
    fn open(&self, name: &ProjectName) -> Result<Repository, GitError> {
        let path = self.repo_path(name);
        if !path.is_dir() {
            return Err(GitError::NotFound(name.to_string()));
        }
        let repo = Repository::new(name.clone(), path);
        self.handles
            .lock()
            .unwrap()
            .insert(name.clone(), repo.clone());
        Ok(repo)
    }

    fn branches(&self, name: &ProjectName) -> Result<Vec<String>, GitError> {
        self.refs(name, "heads")
    }

    fn tags(&self, name: &ProjectName) -> Result<Vec<String>, GitError> {
        self.refs(name, "tags")
    }

    fn evict(&self, name: &ProjectName) {
        self.handles.lock().unwrap().remove(name);
    }

    fn base_paths(&self) -> Vec<PathBuf> {
        vec![self.base.clone()]
    }
}

impl ProjectHierarchy for LocalGitStore {
    fn children(
        &self,
        project: &ProjectName,
        limit: usize,
    ) -> Result<Vec<ProjectName>, StoreError> {
        let all = self
            .list_projects()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(all
            .into_iter()
            .filter(|candidate| project.is_ancestor_of(candidate))
            .take(limit)
            .collect())
    }
}

fn collect_refs(root: &Path, dir: &Path, out: &mut Vec<String>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_refs(root, &path, out)?;
        } else if let Ok(rel) = path.strip_prefix(root) {
            out.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
    Ok(())
}

fn collect_projects(base: &Path, dir: &Path, out: &mut Vec<ProjectName>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if is_trash_folder_name(file_name) {
            continue;
        }
        if let Some(stem) = file_name.strip_suffix(".git") {
            let rel = match path.parent().unwrap_or(base).strip_prefix(base) {
                Ok(parent) if parent.as_os_str().is_empty() => stem.to_string(),
                Ok(parent) => format!("{}/{}", parent.to_string_lossy().replace('\\', "/"), stem),
                Err(_) => continue,
            };
            if let Ok(name) = ProjectName::new(rel) {
                out.push(name);
            }
        } else {
            collect_projects(base, &path, out)?;
        }
    }
    Ok(())
}
