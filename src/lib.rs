//! reclaim - safe deletion and reclamation of hosted git repositories
//!
//! Deleting a hosted repository touches three stores: project metadata, a
//! cache layer, and the on-disk repository directory. This crate
//! implements the safe-deletion protocol around that: a precondition
//! pipeline that proves a project is eligible before anything destructive
//! runs, a crash-safe filesystem lifecycle (atomic rename to a trash
//! marker, then delete or archive), and scheduled background tasks that
//! reclaim archived copies and orphaned trash folders.

pub mod audit;
pub mod clock;
pub mod config;
pub mod delete;
pub mod error;
pub mod events;
pub mod fs;
pub mod hide;
pub mod models;
pub mod preconditions;
pub mod protect;
pub mod schedule;
pub mod store;

// Re-exports for convenience
pub use audit::{DeleteLog, DeleteRecord, JsonDeleteLog, NoopDeleteLog, TextDeleteLog};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, ConfigWarning};
pub use delete::DeleteProject;
pub use error::{DeleteError, DeleteResult};
pub use events::{DeletionEvent, EventDispatcher, ListenerSet, ProjectDeletedListener};
pub use fs::{ArchiveReaper, ReapReport, RepositoryRemover, SweepReport, TrashSweeper};
pub use hide::HideProject;
pub use models::{Capability, DeleteOptions, ProjectName};
pub use preconditions::DeletePreconditions;
pub use protect::ProtectedProjects;
pub use schedule::{Scheduler, Task};
