//! Core domain types
//!
//! `ProjectName` is the hierarchical identity of a hosted repository: a
//! `/`-separated path that doubles as the repository's relative location
//! under a base directory. Identity is immutable; deletion removes the
//! mapping entirely.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error when a project name fails validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectNameError {
    /// Name is empty
    Empty,
    /// Name starts or ends with a separator, or has an empty segment
    EmptySegment,
    /// A segment is `.` or `..`
    Traversal,
}

impl fmt::Display for ProjectNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectNameError::Empty => write!(f, "project name is empty"),
            ProjectNameError::EmptySegment => {
                write!(f, "project name contains an empty segment")
            }
            ProjectNameError::Traversal => {
                write!(f, "project name contains traversal segments (. or ..)")
            }
        }
    }
}

impl std::error::Error for ProjectNameError {}

/// Validated hierarchical project name
///
/// Segments are non-empty, never `.` or `..`, joined by `/`. The name maps
/// onto nested directories below a store base path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectName(String);

impl ProjectName {
    pub fn new(name: impl Into<String>) -> Result<Self, ProjectNameError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ProjectNameError::Empty);
        }
        for segment in name.split('/') {
            if segment.is_empty() {
                return Err(ProjectNameError::EmptySegment);
            }
            if segment == "." || segment == ".." {
                return Err(ProjectNameError::Traversal);
            }
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Number of path segments the name occupies below a base directory.
    pub fn segment_count(&self) -> usize {
        self.0.split('/').count()
    }

    /// True if `other` lives below this name in the namespace.
    pub fn is_ancestor_of(&self, other: &ProjectName) -> bool {
        other
            .0
            .strip_prefix(&self.0)
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ProjectName {
    type Error = ProjectNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ProjectName::new(value)
    }
}

impl From<ProjectName> for String {
    fn from(name: ProjectName) -> String {
        name.0
    }
}

/// Options accepted by the deletion entry points
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOptions {
    /// Bypass soft warnings (open changes)
    #[serde(default)]
    pub force: bool,
    /// Skip filesystem removal; metadata and cache cleanup still run
    #[serde(default)]
    pub preserve: bool,
}

/// Capabilities relevant to deletion authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Server administrator, may delete anything
    AdministrateServer,
    /// May delete any project
    DeleteProject,
    /// May delete projects the caller owns
    DeleteOwnProject,
}
