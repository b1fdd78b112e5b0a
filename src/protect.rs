//! Protected projects
//!
//! The platform's root and system projects can never be deleted, nor can
//! any project matching a configured protection pattern. Patterns are
//! full-name regular expressions compiled once; an invalid pattern is
//! skipped with a warning rather than disabling protection entirely.

use regex::Regex;

use crate::config::Config;
use crate::models::ProjectName;

pub struct ProtectedProjects {
    system: Vec<ProjectName>,
    patterns: Vec<Regex>,
}

impl ProtectedProjects {
    /// `system` names the platform's fixed root/system projects; patterns
    /// come from `deletion.protected_projects`.
    pub fn new(system: Vec<ProjectName>, config: &Config) -> Self {
        let mut patterns = Vec::new();
        for raw in &config.deletion.protected_projects {
            match Regex::new(&anchored(raw)) {
                Ok(re) => patterns.push(re),
                Err(e) => {
                    eprintln!("warning: ignoring invalid protected project pattern '{raw}': {e}");
                }
            }
        }
        Self { system, patterns }
    }

    pub fn is_protected(&self, project: &ProjectName) -> bool {
        self.system.iter().any(|p| p == project)
            || self
                .patterns
                .iter()
                .any(|re| re.is_match(project.as_str()))
    }
}

// Patterns protect whole names, not substrings.
fn anchored(raw: &str) -> String {
    let mut pattern = String::with_capacity(raw.len() + 2);
    if !raw.starts_with('^') {
        pattern.push('^');
    }
    pattern.push_str(raw);
    if !raw.ends_with('$') {
        pattern.push('$');
    }
    pattern
}
