//! Target Port
//!
//! Abstracts the destination transport (local directory, FTP, SSH).

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::entities::Action;

/// Errors raised by target providers
#[derive(Error, Debug)]
pub enum TargetError {
    /// Connection or authentication failed before anything was transferred
    #[error("no usable connection to {target}: {message}")]
    NoConnection { target: String, message: String },

    /// Failure mid-transfer; the destination may be partially updated
    #[error("transfer of '{path}' failed: {message}")]
    Transfer { path: String, message: String },

    /// Local I/O on staged content
    #[error("can't read staged file '{path}': {source}")]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Trait for deployment destinations
pub trait Target {
    /// Human-readable destination (never includes passwords)
    fn display_name(&self) -> String;

    /// Fetch a file from the destination; a missing file yields empty content
    fn read(&self, path: &str) -> Result<Vec<u8>, TargetError>;

    /// Replay ordered actions, reading added content from `work`
    fn send(&self, work: &Path, actions: &[Action]) -> Result<(), TargetError>;

    /// Directory on this machine the destination writes into, if any
    fn local_root(&self) -> Option<&Path> {
        None
    }
}

/// Group consecutive actions sharing a parent directory
///
/// Order is preserved; a parent appearing in two separate runs yields two groups.
pub fn group_by_parent(actions: &[Action]) -> Vec<(&str, Vec<&Action>)> {
    let mut groups: Vec<(&str, Vec<&Action>)> = Vec::new();

    for action in actions {
        match groups.last_mut() {
            Some((parent, members)) if *parent == action.parent() => members.push(action),
            _ => groups.push((action.parent(), vec![action])),
        }
    }

    groups
}

/// Ancestors of a relative directory, shortest first (`a/b` → `a`, `a/b`)
pub fn ancestors(directory: &str) -> Vec<String> {
    let mut parents = Vec::new();
    let mut current = String::new();

    for segment in directory.split('/').filter(|s| !s.is_empty()) {
        if !current.is_empty() {
            current.push('/');
        }
        current.push_str(segment);
        parents.push(current.clone());
    }

    parents
}
