//! External collaborator ports
//!
//! The metadata store, git storage, hierarchy/change queries, permission
//! backend, and caches are collaborators of the deletion pipeline. Each is
//! a small single-concern trait; concrete platform bindings live with the
//! embedder. `LocalGitStore` is the one real implementation shipped here.

mod git;
mod local;
mod metadata;
mod platform;

pub use git::{GitError, GitStore, Repository};
pub use local::LocalGitStore;
pub use metadata::{HandlerRegistry, MetadataDeleteHandler, NullMetadataHandler};
pub use platform::{
    AdminPermissions, ChangeQuery, NoChangeIndex, NoProjectCache, NoSubscriptions,
    PermissionBackend, ProjectCache, ProjectConfigStore, ProjectHierarchy, SubscriptionTracker,
};

use thiserror::Error;

/// Failure reported by a store collaborator
#[derive(Error, Debug)]
pub enum StoreError {
    /// The addressed record or repository does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The store rejected the operation
    #[error("{0}")]
    Invalid(String),

    /// The store could not be reached or queried
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
