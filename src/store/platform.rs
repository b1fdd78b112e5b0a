//! Platform query and cache ports used by the precondition pipeline,
//! the orchestrator, and the hide-on-preserve path.

use crate::models::{Capability, ProjectName};

use super::StoreError;

/// Namespace-prefix query over the project hierarchy
pub trait ProjectHierarchy: Send + Sync {
    /// Direct and transitive children of the project, up to `limit`.
    fn children(&self, project: &ProjectName, limit: usize) -> Result<Vec<ProjectName>, StoreError>;
}

/// Open units of work (unresolved change records) scoped to a project
pub trait ChangeQuery: Send + Sync {
    fn open_changes(&self, project: &ProjectName) -> Result<Vec<String>, StoreError>;
}

/// Submodule subscription graph
pub trait SubscriptionTracker: Send + Sync {
    /// Projects whose submodule subscriptions target or source any of the
    /// given branches of `project`.
    fn subscribers(
        &self,
        project: &ProjectName,
        branches: &[String],
    ) -> Result<Vec<ProjectName>, StoreError>;
}

/// Capability checks for the calling user
pub trait PermissionBackend: Send + Sync {
    fn has_capability(&self, user: &str, capability: Capability) -> bool;

    /// Whether the user owns (may administer) the given project.
    fn is_owner(&self, user: &str, project: &ProjectName) -> bool;
}

/// Cached per-project state keyed by name
pub trait ProjectCache: Send + Sync {
    fn evict(&self, project: &ProjectName);
}

/// Project configuration records, used by the hide-on-preserve path
pub trait ProjectConfigStore: Send + Sync {
    fn exists(&self, project: &ProjectName) -> bool;

    /// Create an empty project record.
    fn create(&self, project: &ProjectName) -> Result<(), StoreError>;

    /// Mark the project hidden, clear its access sections, and reparent it.
    fn hide(&self, project: &ProjectName, new_parent: &ProjectName) -> Result<(), StoreError>;
}

/// All-permissive permission backend for local administrative use.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminPermissions;

impl PermissionBackend for AdminPermissions {
    fn has_capability(&self, _user: &str, _capability: Capability) -> bool {
        true
    }

    fn is_owner(&self, _user: &str, _project: &ProjectName) -> bool {
        true
    }
}

/// Change query for deployments without a change index.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoChangeIndex;

impl ChangeQuery for NoChangeIndex {
    fn open_changes(&self, _project: &ProjectName) -> Result<Vec<String>, StoreError> {
        Ok(Vec::new())
    }
}

/// Subscription tracker for deployments without submodule subscriptions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSubscriptions;

impl SubscriptionTracker for NoSubscriptions {
    fn subscribers(
        &self,
        _project: &ProjectName,
        _branches: &[String],
    ) -> Result<Vec<ProjectName>, StoreError> {
        Ok(Vec::new())
    }
}

/// Cache eviction is a no-op when nothing is cached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProjectCache;

impl ProjectCache for NoProjectCache {
    fn evict(&self, _project: &ProjectName) {}
}
