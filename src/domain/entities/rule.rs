//! Rule entity - one user-declared transformation
//!
//! Matching and path rewriting are pure; their side effects (commands,
//! staging) are carried out by `RulePipeline`.

use regex::Regex;

use crate::error::ConfigError;

/// A transformation applied to actions whose path matches `pattern`
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    /// Shell command run once per deployment, in the base directory
    pub run: Option<String>,
    /// Source paths deployed alongside any matching action, once per deployment
    pub link: Vec<String>,
    /// Drop matching actions and their staged content
    pub ignore: bool,
    /// Regex replacement producing the destination path
    pub rename: Option<String>,
    /// Shell command filtering the staged content (stdin → stdout)
    pub adapt: Option<String>,
}

impl Rule {
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let pattern = Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            pattern,
            run: None,
            link: Vec::new(),
            ignore: false,
            rename: None,
            adapt: None,
        })
    }

    /// Rule that drops exactly one path
    pub fn ignore_path(path: &str) -> Result<Self, ConfigError> {
        let mut rule = Self::new(&format!("^{}$", regex::escape(path)))?;
        rule.ignore = true;
        Ok(rule)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn matches(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }

    /// Destination path after `rename`, or the path itself
    pub fn renamed(&self, path: &str) -> String {
        match &self.rename {
            Some(replacement) => self
                .pattern
                .replace(path, replacement.as_str())
                .into_owned(),
            None => path.to_string(),
        }
    }
}
