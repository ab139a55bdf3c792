//! Deploy Options
//!
//! Inputs of one deployment run, built from the command line.

use std::path::PathBuf;

use crate::infrastructure::config::{DEFAULT_DEFINITION_PATH, DEFAULT_ENVIRONMENT_PATH};

/// Options for the deploy use case
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Source tree root
    pub base: PathBuf,
    /// Definition file, relative to `base` (and to every subsidiary base)
    pub definition: PathBuf,
    /// Environment file, relative to `base` (and to every subsidiary base)
    pub environment: PathBuf,
    /// Requested location names; empty means `default`, `*` means all
    pub names: Vec<String>,
    /// Extra paths to force-add (top level only)
    pub append: Vec<String>,
    /// Extra paths to force-delete (top level only)
    pub remove: Vec<String>,
    /// Origin revision override; `""` is the empty tree
    pub rev_from: Option<String>,
    /// Target revision override
    pub rev_to: Option<String>,
    /// Answer yes to every prompt
    pub yes: bool,
}

impl DeployOptions {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            definition: PathBuf::from(DEFAULT_DEFINITION_PATH),
            environment: PathBuf::from(DEFAULT_ENVIRONMENT_PATH),
            names: Vec::new(),
            append: Vec::new(),
            remove: Vec::new(),
            rev_from: None,
            rev_to: None,
            yes: false,
        }
    }

    pub fn with_definition(mut self, path: impl Into<PathBuf>) -> Self {
        self.definition = path.into();
        self
    }

    pub fn with_environment(mut self, path: impl Into<PathBuf>) -> Self {
        self.environment = path.into();
        self
    }

    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.names = names;
        self
    }

    pub fn with_append(mut self, paths: Vec<String>) -> Self {
        self.append = paths;
        self
    }

    pub fn with_remove(mut self, paths: Vec<String>) -> Self {
        self.remove = paths;
        self
    }

    pub fn with_rev_from(mut self, revision: Option<String>) -> Self {
        self.rev_from = revision;
        self
    }

    pub fn with_rev_to(mut self, revision: Option<String>) -> Self {
        self.rev_to = revision;
        self
    }

    pub fn with_yes(mut self, yes: bool) -> Self {
        self.yes = yes;
        self
    }
}
