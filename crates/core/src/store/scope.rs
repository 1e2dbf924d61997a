// Scope resolution: where a scope's collection lives, if anywhere.

use std::path::{Path, PathBuf};

use reqbook_common::types::Scope;

use crate::config::Config;

/// Key of the global slot holding the saved request array.
pub const GLOBAL_REQUESTS_KEY: &str = "reqbook.savedRequests";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// A key in the global state file.
    GlobalSlot(&'static str),
    /// The project store file.
    ProjectFile(PathBuf),
    /// No project is open; reads are empty and writes are no-ops.
    Unavailable,
}

impl Location {
    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}

/// Maps a scope tag to a concrete location. The active project root is an
/// explicit input, never read from ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeResolver {
    project_root: Option<PathBuf>,
    project_store: PathBuf,
}

impl ScopeResolver {
    pub fn new(project_root: Option<PathBuf>, project_store: impl Into<PathBuf>) -> Self {
        Self { project_root, project_store: project_store.into() }
    }

    pub fn from_config(config: &Config, project_root: Option<PathBuf>) -> Self {
        Self::new(project_root, config.project_store.clone())
    }

    /// Use the first of the host's open roots, if any.
    pub fn from_roots(roots: &[PathBuf], project_store: impl Into<PathBuf>) -> Self {
        Self::new(roots.first().cloned(), project_store)
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    pub fn resolve(&self, scope: Scope) -> Location {
        match scope {
            Scope::Global => Location::GlobalSlot(GLOBAL_REQUESTS_KEY),
            Scope::Project => match &self.project_root {
                Some(root) => Location::ProjectFile(root.join(&self.project_store)),
                None => Location::Unavailable,
            },
        }
    }
}
