//! Definition file loader

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;

use super::{deserialize, ConfigWarning};
use crate::domain::entities::{Definition, HashOptions, Rule};
use crate::domain::value_objects::{DigestAlgorithm, SourceType};
use crate::error::ConfigError;

/// Definition file path, relative to the base directory
pub const DEFAULT_DEFINITION_PATH: &str = ".deltaship.def";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DefinitionFile {
    source: Option<String>,
    hash: HashSection,
    rules: Vec<RuleSection>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct HashSection {
    algorithm: String,
    follow_symlinks: bool,
}

impl Default for HashSection {
    fn default() -> Self {
        Self {
            algorithm: DigestAlgorithm::default().name().to_string(),
            follow_symlinks: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RuleSection {
    pattern: String,
    run: Option<String>,
    #[serde(default)]
    link: Vec<String>,
    #[serde(default)]
    ignore: bool,
    rename: Option<String>,
    adapt: Option<String>,
}

impl RuleSection {
    fn into_rule(self) -> Result<Rule, ConfigError> {
        let mut rule = Rule::new(&self.pattern)?;
        rule.run = self.run;
        rule.link = self.link;
        rule.ignore = self.ignore;
        rule.rename = self.rename;
        rule.adapt = self.adapt;
        Ok(rule)
    }
}

/// Parse definition text
pub fn parse_definition(
    content: &str,
    file: &Path,
) -> Result<(Definition, Vec<ConfigWarning>), ConfigError> {
    let (raw, warnings): (DefinitionFile, _) = deserialize(content, file)?;

    let source = raw.source.as_deref().map(str::parse::<SourceType>).transpose()?;
    let hash = HashOptions {
        algorithm: raw.hash.algorithm.parse()?,
        follow_symlinks: raw.hash.follow_symlinks,
    };
    let rules = raw
        .rules
        .into_iter()
        .map(RuleSection::into_rule)
        .collect::<Result<Vec<_>, _>>()?;

    Ok((
        Definition {
            source,
            hash,
            rules,
        },
        warnings,
    ))
}

/// Load the definition file; an absent file yields the defaults
pub fn load_definition(file: &Path) -> Result<(Definition, Vec<ConfigWarning>), ConfigError> {
    match fs::read_to_string(file) {
        Ok(content) => parse_definition(&content, file),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok((Definition::default(), Vec::new())),
        Err(e) => Err(ConfigError::Io(e)),
    }
}
