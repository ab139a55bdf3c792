//! Manual Overrides
//!
//! Expands `append`/`remove` entries (files, directories or globs relative
//! to the base directory) into forced ADD and DEL actions.

use std::path::Path;

use ignore::overrides::OverrideBuilder;
use tracing::warn;

use crate::domain::entities::{normalize_path, Action};
use crate::infrastructure::fs::{local, StagingArea};

fn is_glob(entry: &str) -> bool {
    entry.contains(['*', '?', '['])
}

/// Files under `base` matching a glob, relative and sorted
fn expand_glob(base: &Path, pattern: &str, follow_links: bool) -> Vec<String> {
    let mut builder = OverrideBuilder::new(base);
    let matcher = match builder.add(pattern).and_then(|b| b.build()) {
        Ok(matcher) => matcher,
        Err(e) => {
            warn!("Invalid pattern '{}': {}", pattern, e);
            return Vec::new();
        }
    };

    match local::list_files(base, "", follow_links) {
        Ok(files) => files
            .into_iter()
            .filter(|f| matcher.matched(f, false).is_whitelist())
            .collect(),
        Err(e) => {
            warn!("Can't list files for pattern '{}': {}", pattern, e);
            Vec::new()
        }
    }
}

/// Existing files an entry refers to: the file itself, a directory's
/// contents, or glob matches
fn expand(base: &Path, entry: &str, follow_links: bool) -> Option<Vec<String>> {
    let relative = normalize_path(entry);
    let full = local::resolve(base, &relative);

    if full.is_file() {
        Some(vec![relative])
    } else if full.is_dir() {
        match local::list_files(base, &relative, follow_links) {
            Ok(files) => Some(files),
            Err(e) => {
                warn!("Can't list directory '{}': {}", relative, e);
                Some(Vec::new())
            }
        }
    } else if is_glob(entry) {
        Some(expand_glob(base, entry, follow_links))
    } else {
        None
    }
}

/// Forced ADDs, with content staged from `base`; missing entries warn
pub fn append_actions(
    base: &Path,
    staging: &StagingArea,
    entries: &[String],
    follow_links: bool,
) -> Vec<Action> {
    let mut actions = Vec::new();

    for entry in entries {
        let files = match expand(base, entry, follow_links) {
            Some(files) if !files.is_empty() => files,
            _ => {
                warn!("Can't append missing file '{}'", entry);
                continue;
            }
        };

        for file in files {
            match staging.stage(base, &file) {
                Ok(()) => actions.push(Action::add(file)),
                Err(e) => warn!("Can't copy file '{}': {}", file, e),
            }
        }
    }

    actions
}

/// Forced DELs; entries absent from `base` are deleted literally
pub fn remove_actions(base: &Path, entries: &[String], follow_links: bool) -> Vec<Action> {
    let mut actions = Vec::new();

    for entry in entries {
        match expand(base, entry, follow_links) {
            Some(files) => actions.extend(files.into_iter().map(Action::del)),
            None => actions.push(Action::del(normalize_path(entry))),
        }
    }

    actions
}
