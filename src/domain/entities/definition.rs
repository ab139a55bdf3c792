//! Definition entity - source selection and rules for one source tree

use crate::domain::value_objects::{DigestAlgorithm, SourceType};

use super::Rule;

/// Options for the content-hash source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashOptions {
    pub algorithm: DigestAlgorithm,
    pub follow_symlinks: bool,
}

impl Default for HashOptions {
    fn default() -> Self {
        Self {
            algorithm: DigestAlgorithm::default(),
            follow_symlinks: true,
        }
    }
}

/// Parsed definition file (or defaults when absent)
#[derive(Debug, Clone, Default)]
pub struct Definition {
    /// Explicit source type; `None` means auto-detect
    pub source: Option<SourceType>,
    pub hash: HashOptions,
    /// Declared rules in evaluation order
    pub rules: Vec<Rule>,
}

impl Definition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: SourceType) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }
}
