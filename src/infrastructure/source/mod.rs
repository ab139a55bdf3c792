//! Source Providers
//!
//! - `hash` - Content-hash tree snapshots
//! - `git` - Git history

mod git;
mod hash;

pub use git::{parse_name_status, GitSource};
pub use hash::HashSource;

use std::path::Path;

use tracing::debug;

use crate::domain::entities::Definition;
use crate::domain::ports::Source;
use crate::domain::value_objects::SourceType;
use crate::error::ConfigError;

/// Environment variable forcing the source type
pub const SOURCE_ENV_VAR: &str = "DELTASHIP_SOURCE";

/// Source type for `base`: environment override, then definition, then detection
pub fn select_source_type(
    env_override: Option<&str>,
    definition: &Definition,
    base: &Path,
) -> Result<SourceType, ConfigError> {
    if let Some(name) = env_override.filter(|n| !n.trim().is_empty()) {
        return name.parse();
    }

    Ok(definition.source.unwrap_or_else(|| detect(base)))
}

/// `git` when `base` or any ancestor holds a `.git` entry, `hash` otherwise
pub fn detect(base: &Path) -> SourceType {
    let absolute = base.canonicalize().unwrap_or_else(|_| base.to_path_buf());

    match absolute.ancestors().find(|dir| dir.join(".git").exists()) {
        Some(root) => {
            debug!("Found git repository at '{}'", root.display());
            SourceType::Git
        }
        None => SourceType::Hash,
    }
}

/// Build the source provider for a tree
///
/// `excluded` paths (relative to `base`) never enter content-hash snapshots.
pub fn create_source(
    definition: &Definition,
    base: &Path,
    excluded: &[String],
) -> Result<Box<dyn Source>, ConfigError> {
    let env_override = std::env::var(SOURCE_ENV_VAR).ok();
    let source_type = select_source_type(env_override.as_deref(), definition, base)?;

    let source: Box<dyn Source> = match source_type {
        SourceType::Hash => Box::new(HashSource::new(definition.hash).with_excluded(excluded)),
        SourceType::Git => Box::new(GitSource::new()),
    };
    debug!("Using {} source for '{}'", source.name(), base.display());

    Ok(source)
}
