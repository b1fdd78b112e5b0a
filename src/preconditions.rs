//! Deletion precondition pipeline
//!
//! An ordered list of independent checks proving a project is eligible for
//! removal before anything destructive runs. Hard blocks stop the
//! pipeline at the first failure; the open-changes check is a soft
//! warning that `force` overrides. A query-layer error during any check
//! is itself a blocking reason, never silently ignored.

use crate::config::Config;
use crate::error::{DeleteError, DeleteResult};
use crate::models::{Capability, DeleteOptions, ProjectName};
use crate::protect::ProtectedProjects;
use crate::store::{ChangeQuery, GitError, GitStore, PermissionBackend, ProjectHierarchy,
    SubscriptionTracker};

/// How many child projects a conflict message enumerates.
const CHILD_LIMIT: usize = 10;

pub struct DeletePreconditions<'a> {
    config: &'a Config,
    protected: &'a ProtectedProjects,
    hierarchy: &'a dyn ProjectHierarchy,
    changes: &'a dyn ChangeQuery,
    git: &'a dyn GitStore,
    subscriptions: &'a dyn SubscriptionTracker,
    permissions: &'a dyn PermissionBackend,
}

impl<'a> DeletePreconditions<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &'a Config,
        protected: &'a ProtectedProjects,
        hierarchy: &'a dyn ProjectHierarchy,
        changes: &'a dyn ChangeQuery,
        git: &'a dyn GitStore,
        subscriptions: &'a dyn SubscriptionTracker,
        permissions: &'a dyn PermissionBackend,
    ) -> Self {
        Self {
            config,
            protected,
            hierarchy,
            changes,
            git,
            subscriptions,
            permissions,
        }
    }

    pub fn can_delete(&self, user: &str, project: &ProjectName) -> bool {
        self.permissions
            .has_capability(user, Capability::AdministrateServer)
            || self.permissions.has_capability(user, Capability::DeleteProject)
            || (self
                .permissions
                .has_capability(user, Capability::DeleteOwnProject)
                && self.permissions.is_owner(user, project))
    }

    pub fn assert_delete_permission(
        &self,
        user: &str,
        project: &ProjectName,
    ) -> DeleteResult<()> {
        if self.can_delete(user, project) {
            Ok(())
        } else {
            Err(DeleteError::Unauthorized)
        }
    }

    /// Run the pipeline. An empty result means the project is deletable.
    pub fn evaluate(&self, project: &ProjectName, options: &DeleteOptions) -> Vec<String> {
        if let Err(reason) = self.check_protected(project) {
            return vec![reason];
        }
        if let Err(reason) = self.check_children(project) {
            return vec![reason];
        }
        if let Err(reason) = self.check_subscriptions(project) {
            return vec![reason];
        }
        if let Err(reason) = self.check_tags(project, options.preserve) {
            return vec![reason];
        }
        if !options.force {
            if let Err(reason) = self.check_open_changes(project) {
                return vec![reason];
            }
        }
        Vec::new()
    }

    pub fn assert_can_delete(
        &self,
        project: &ProjectName,
        options: &DeleteOptions,
    ) -> DeleteResult<()> {
        let reasons = self.evaluate(project, options);
        if reasons.is_empty() {
            Ok(())
        } else {
            Err(DeleteError::Conflict {
                project: project.to_string(),
                reasons,
            })
        }
    }

    fn check_protected(&self, project: &ProjectName) -> Result<(), String> {
        if self.protected.is_protected(project) {
            Err(format!("Project {project} is protected against deletion"))
        } else {
            Ok(())
        }
    }

    fn check_children(&self, project: &ProjectName) -> Result<(), String> {
        let children = self
            .hierarchy
            .children(project, CHILD_LIMIT)
            .map_err(|_| format!("Unable to verify if {project} has children projects"))?;
        if children.is_empty() {
            return Ok(());
        }
        let names: Vec<&str> = children.iter().map(|c| c.as_str()).collect();
        Err(format!(
            "Cannot delete project {project} because it has children: {}",
            names.join(", ")
        ))
    }

    // The project's own repository being gone must not stop the deletion;
    // any other I/O failure blocks it.
    fn check_subscriptions(&self, project: &ProjectName) -> Result<(), String> {
        let branches = match self.git.branches(project) {
            Ok(branches) => branches,
            Err(GitError::NotFound(_)) => return Ok(()),
            Err(GitError::Io(_)) => {
                return Err(format!(
                    "Unable to verify if {project} is subscribed by other projects"
                ))
            }
        };
        let subscribers = self
            .subscriptions
            .subscribers(project, &branches)
            .map_err(|_| {
                format!("Unable to verify if {project} is subscribed by other projects")
            })?;
        if subscribers.is_empty() {
            return Ok(());
        }
        let names: Vec<&str> = subscribers.iter().map(|s| s.as_str()).collect();
        Err(format!(
            "Project {project} is subscribed by other projects: {}",
            names.join(", ")
        ))
    }

    fn check_tags(&self, project: &ProjectName, preserve: bool) -> Result<(), String> {
        if preserve || self.config.deletion.allow_deletion_of_repos_with_tags {
            return Ok(());
        }
        let tags = self
            .git
            .tags(project)
            .map_err(|_| format!("Unable to verify if project {project} has tags"))?;
        if tags.is_empty() {
            Ok(())
        } else {
            Err(format!("Project {project} has tags"))
        }
    }

    fn check_open_changes(&self, project: &ProjectName) -> Result<(), String> {
        let open = self
            .changes
            .open_changes(project)
            .map_err(|_| format!("Unable to verify if '{project}' has open changes"))?;
        if open.is_empty() {
            Ok(())
        } else {
            Err(format!("Project '{project}' has open changes"))
        }
    }
}
