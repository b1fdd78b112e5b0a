//! Hide-on-preserve
//!
//! When configured, preserving a project converts it in place to a hidden
//! placeholder instead of deleting anything: state becomes hidden, access
//! sections are cleared, and the project is reparented under the
//! configured parent for deleted projects (created on first use).

use crate::error::{DeleteError, DeleteResult};
use crate::models::ProjectName;
use crate::store::{ProjectCache, ProjectConfigStore, StoreError};

pub struct HideProject<'a> {
    config_store: &'a dyn ProjectConfigStore,
    cache: &'a dyn ProjectCache,
    parent: ProjectName,
}

impl<'a> HideProject<'a> {
    pub fn new(
        config_store: &'a dyn ProjectConfigStore,
        cache: &'a dyn ProjectCache,
        parent: ProjectName,
    ) -> Self {
        Self {
            config_store,
            cache,
            parent,
        }
    }

    pub fn apply(&self, project: &ProjectName) -> DeleteResult<()> {
        if !self.config_store.exists(&self.parent) {
            self.config_store.create(&self.parent).map_err(|_| {
                DeleteError::conflict(
                    project.as_str(),
                    format!("Failed to create project {}", self.parent),
                )
            })?;
        }
        self.config_store
            .hide(project, &self.parent)
            .map_err(|e| match e {
                StoreError::NotFound(_) => DeleteError::NotFound(project.to_string()),
                StoreError::Invalid(message) => DeleteError::conflict(project.as_str(), message),
                other => DeleteError::Store(other),
            })?;
        self.cache.evict(project);
        Ok(())
    }
}
