//! Deletion orchestrator
//!
//! Sequences one deletion: authorization, preconditions, metadata store
//! delete, filesystem lifecycle (or hide-on-preserve), cache eviction,
//! event dispatch. A metadata failure is logged and does not stop the
//! filesystem step: keeping a repository directory that references
//! deleted records would be the worse inconsistency. Every attempt is
//! written to the audit log, success or failure.

use crate::audit::{DeleteLog, DeleteRecord};
use crate::clock::Clock;
use crate::config::Config;
use crate::error::DeleteResult;
use crate::events::{DeletionEvent, EventDispatcher};
use crate::fs::RepositoryRemover;
use crate::hide::HideProject;
use crate::models::{DeleteOptions, ProjectName};
use crate::preconditions::DeletePreconditions;
use crate::store::{MetadataDeleteHandler, ProjectCache};

pub struct DeleteProject<'a> {
    preconditions: &'a DeletePreconditions<'a>,
    metadata: &'a dyn MetadataDeleteHandler,
    remover: &'a RepositoryRemover<'a>,
    cache: &'a dyn ProjectCache,
    hide: &'a HideProject<'a>,
    config: &'a Config,
    dispatcher: &'a dyn EventDispatcher,
    delete_log: &'a dyn DeleteLog,
    clock: &'a dyn Clock,
}

impl<'a> DeleteProject<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        preconditions: &'a DeletePreconditions<'a>,
        metadata: &'a dyn MetadataDeleteHandler,
        remover: &'a RepositoryRemover<'a>,
        cache: &'a dyn ProjectCache,
        hide: &'a HideProject<'a>,
        config: &'a Config,
        dispatcher: &'a dyn EventDispatcher,
        delete_log: &'a dyn DeleteLog,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            preconditions,
            metadata,
            remover,
            cache,
            hide,
            config,
            dispatcher,
            delete_log,
            clock,
        }
    }

    /// The programmatic deletion entry point: authorization, precondition
    /// pipeline, then the destructive sequence.
    pub fn apply(
        &self,
        user: &str,
        project: &ProjectName,
        options: &DeleteOptions,
    ) -> DeleteResult<()> {
        self.preconditions.assert_delete_permission(user, project)?;
        self.preconditions.assert_can_delete(project, options)?;
        self.do_delete(user, project, options)
    }

    /// Warnings the caller may want acknowledged before forcing.
    pub fn warnings(&self, project: &ProjectName) -> Vec<String> {
        match self.metadata.warnings(project) {
            Ok(warnings) => warnings,
            Err(e) => vec![format!("Unable to query warnings for {project}: {e}")],
        }
    }

    /// Run the destructive sequence, skipping authorization and
    /// preconditions. Callers are expected to have asserted both.
    pub fn do_delete(
        &self,
        user: &str,
        project: &ProjectName,
        options: &DeleteOptions,
    ) -> DeleteResult<()> {
        let result = self.delete_and_notify(user, project, options);
        let record = DeleteRecord::new(
            self.clock.now(),
            user,
            project,
            *options,
            result.as_ref().err().map(|e| e.to_string()),
        );
        self.delete_log.on_delete(&record);
        result
    }

    fn delete_and_notify(
        &self,
        user: &str,
        project: &ProjectName,
        options: &DeleteOptions,
    ) -> DeleteResult<()> {
        if !options.preserve || !self.config.deletion.hide_project_on_preserve {
            if let Err(e) = self.metadata.delete(project) {
                // Forward progress: the filesystem step still runs, the
                // leftover records are an accepted inconsistency.
                eprintln!("warning: metadata deletion for {project} failed: {e}");
            }
            self.remover.remove(project, options.preserve)?;
            self.cache.evict(project);
        } else {
            self.hide.apply(project)?;
        }

        let event = DeletionEvent {
            project: project.to_string(),
            initiator: user.to_string(),
            options: *options,
        };
        if let Err(e) = self.dispatcher.post(&event) {
            eprintln!("warning: failure dispatching deletion event for {project}: {e}");
        }
        Ok(())
    }
}
