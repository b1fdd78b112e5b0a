//! Metadata store port and schema-version selection
//!
//! The hosting platform's metadata schema evolves; each supported version
//! provides its own delete handler. The handler is selected once at
//! startup from a version lookup table: an unknown version is a startup
//! error, never a delete-time surprise.

use std::collections::BTreeMap;

use crate::models::ProjectName;

use super::StoreError;

/// Deletion-side view of the metadata store
pub trait MetadataDeleteHandler: Send + Sync {
    /// Verify the store can delete the project's records.
    fn assert_deletable(&self, project: &ProjectName) -> Result<(), StoreError>;

    /// Non-blocking warnings against deleting the project (e.g. open
    /// changes counted by the store itself).
    fn warnings(&self, project: &ProjectName) -> Result<Vec<String>, StoreError>;

    /// Remove all records keyed by the project. Per-record failures are
    /// expected to be handled best-effort inside the store; the aggregate
    /// error is surfaced for logging only.
    fn delete(&self, project: &ProjectName) -> Result<(), StoreError>;
}

/// Version-to-handler lookup table, populated at process startup.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: BTreeMap<u32, Box<dyn MetadataDeleteHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        schema_version: u32,
        handler: Box<dyn MetadataDeleteHandler>,
    ) -> &mut Self {
        self.handlers.insert(schema_version, handler);
        self
    }

    /// Select the handler for the detected schema version. Fails fast so a
    /// misconfigured deployment never reaches a delete call.
    pub fn select(&self, schema_version: u32) -> Result<&dyn MetadataDeleteHandler, StoreError> {
        self.handlers
            .get(&schema_version)
            .map(|h| h.as_ref())
            .ok_or_else(|| {
                StoreError::Invalid(format!(
                    "unsupported metadata schema version {schema_version}"
                ))
            })
    }
}

/// Handler for deployments without a metadata backend (standalone CLI use).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMetadataHandler;

impl MetadataDeleteHandler for NullMetadataHandler {
    fn assert_deletable(&self, _project: &ProjectName) -> Result<(), StoreError> {
        Ok(())
    }

    fn warnings(&self, _project: &ProjectName) -> Result<Vec<String>, StoreError> {
        Ok(Vec::new())
    }

    fn delete(&self, _project: &ProjectName) -> Result<(), StoreError> {
        Ok(())
    }
}
