//! Filesystem side of deletion
//!
//! `RepositoryRemover` performs the crash-safe removal/archival of a
//! repository directory; `ArchiveReaper` and `TrashSweeper` are the
//! recurring tasks that reclaim what it leaves behind.

mod lifecycle;
mod reaper;
mod sweeper;

pub use lifecycle::{base_path, RepositoryRemover, TIMESTAMP_FORMAT};
pub use reaper::{ArchiveReaper, ReapReport};
pub use sweeper::{is_trash_folder_name, SweepReport, TrashSweeper};
