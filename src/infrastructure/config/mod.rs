//! Configuration Files
//!
//! - `definition` - `.deltaship.def`: source selection and rules
//! - `environment` - `.deltaship.env`: named locations
//!
//! Both are TOML. Unknown keys never fail a load; they come back as
//! `ConfigWarning`s for the caller to log.

mod definition;
mod environment;

pub use definition::{load_definition, parse_definition, DEFAULT_DEFINITION_PATH};
pub use environment::{load_environment, parse_environment, DEFAULT_ENVIRONMENT_PATH};

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::ConfigError;

/// Non-fatal configuration warning (e.g. unknown key)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// Dotted path of the unknown key
    pub key: String,
    pub file: PathBuf,
    /// 1-indexed line, when the key can be found in the source text
    pub line: Option<usize>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(
                f,
                "unknown key '{}' in {}:{}",
                self.key,
                self.file.display(),
                line
            ),
            None => write!(f, "unknown key '{}' in {}", self.key, self.file.display()),
        }
    }
}

/// Deserialize TOML, collecting ignored keys as warnings
fn deserialize<T: DeserializeOwned>(
    content: &str,
    file: &Path,
) -> Result<(T, Vec<ConfigWarning>), ConfigError> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let value: T = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Invalid {
        file: file.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|key| {
            let leaf = key.rsplit('.').next().unwrap_or(key.as_str()).to_string();
            ConfigWarning {
                line: find_line_number(content, &leaf),
                key,
                file: file.to_path_buf(),
            }
        })
        .collect();

    Ok((value, warnings))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.trim_start().starts_with(needle))
        .map(|i| i + 1)
}
