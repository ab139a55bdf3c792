//! Environment file loader
//!
//! ```toml
//! [staging]
//! connection = "ftp://deploy@example.com/www"
//! append_files = ["vendor/"]
//!
//! [staging.options]
//! passive = false
//!
//! [staging.subsidiaries]
//! "themes/blue" = "staging"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{deserialize, ConfigWarning};
use crate::domain::entities::{Environment, Location, LocationOptions, DEFAULT_STATE_PATH};
use crate::error::ConfigError;

/// Environment file path, relative to the base directory
pub const DEFAULT_ENVIRONMENT_PATH: &str = ".deltaship.env";

#[derive(Debug, Deserialize)]
#[serde(default)]
struct LocationSection {
    connection: Option<String>,
    options: OptionsSection,
    local: bool,
    state: String,
    append_files: Vec<String>,
    remove_files: Vec<String>,
    subsidiaries: BTreeMap<String, Names>,
}

impl Default for LocationSection {
    fn default() -> Self {
        Self {
            connection: None,
            options: OptionsSection::default(),
            local: false,
            state: DEFAULT_STATE_PATH.to_string(),
            append_files: Vec::new(),
            remove_files: Vec::new(),
            subsidiaries: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct OptionsSection {
    passive: bool,
    identity: Option<PathBuf>,
}

impl Default for OptionsSection {
    fn default() -> Self {
        let defaults = LocationOptions::default();
        Self {
            passive: defaults.passive,
            identity: defaults.identity,
        }
    }
}

/// A single location name or a list of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Names {
    One(String),
    Many(Vec<String>),
}

impl Names {
    fn into_vec(self) -> Vec<String> {
        match self {
            Names::One(name) => vec![name],
            Names::Many(names) => names,
        }
    }
}

/// Parse environment text
pub fn parse_environment(
    content: &str,
    file: &Path,
) -> Result<(Environment, Vec<ConfigWarning>), ConfigError> {
    let (raw, warnings): (BTreeMap<String, LocationSection>, _) = deserialize(content, file)?;

    let mut environment = Environment::new();
    for (name, section) in raw {
        environment.insert(Location {
            name,
            connection: section.connection.filter(|c| !c.trim().is_empty()),
            options: LocationOptions {
                passive: section.options.passive,
                identity: section.options.identity,
            },
            local: section.local,
            state: section.state,
            append_files: section.append_files,
            remove_files: section.remove_files,
            subsidiaries: section
                .subsidiaries
                .into_iter()
                .map(|(path, names)| (path, names.into_vec()))
                .collect(),
        });
    }

    Ok((environment, warnings))
}

/// Load the environment file; it must exist
pub fn load_environment(file: &Path) -> Result<(Environment, Vec<ConfigWarning>), ConfigError> {
    match fs::read_to_string(file) {
        Ok(content) => parse_environment(&content, file),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ConfigError::MissingEnvironment {
            path: file.to_path_buf(),
        }),
        Err(e) => Err(ConfigError::Io(e)),
    }
}
