//! Deletion event plumbing
//!
//! Two observers exist: `ProjectDeletedListener`s fire when a repository
//! directory is removed from disk (always with notification suppressed),
//! and an `EventDispatcher` receives the orchestrator-level deletion
//! event. Listener failures are logged per listener and never abort the
//! surrounding operation.

use crate::models::{DeleteOptions, ProjectName};

/// Whether downstream user-facing notification should be sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notify {
    None,
    All,
}

/// Fired when a repository directory has been removed (or archived)
#[derive(Debug, Clone)]
pub struct RepoDeletedEvent {
    pub project: String,
    pub notify: Notify,
}

/// Observer of repository removals
pub trait ProjectDeletedListener: Send + Sync {
    fn on_project_deleted(
        &self,
        event: &RepoDeletedEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Registered listeners, notified one by one with error isolation.
#[derive(Default)]
pub struct ListenerSet {
    listeners: Vec<Box<dyn ProjectDeletedListener>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: Box<dyn ProjectDeletedListener>) {
        self.listeners.push(listener);
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Notify every listener; a failing listener is logged and skipped.
    pub fn notify_deleted(&self, project: &ProjectName) {
        if self.listeners.is_empty() {
            return;
        }
        let event = RepoDeletedEvent {
            project: project.to_string(),
            notify: Notify::None,
        };
        for listener in &self.listeners {
            if let Err(e) = listener.on_project_deleted(&event) {
                eprintln!("warning: failure in project-deleted listener: {e}");
            }
        }
    }
}

/// Orchestrator-level deletion event
#[derive(Debug, Clone)]
pub struct DeletionEvent {
    pub project: String,
    pub initiator: String,
    pub options: DeleteOptions,
}

/// Receives the deletion event after a project is gone
pub trait EventDispatcher: Send + Sync {
    fn post(
        &self,
        event: &DeletionEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Dispatcher for deployments with no event bus
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDispatcher;

impl EventDispatcher for NoopDispatcher {
    fn post(
        &self,
        _event: &DeletionEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}
