//! Action entity
//!
//! A single file-level operation replayed against a destination.

use std::cmp::Ordering;
use std::fmt;

/// Kind of file operation
///
/// Declaration order is the sort precedence: deletions run before additions
/// so a path freed by a type change (file ↔ directory) is empty before the
/// replacement content lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKind {
    /// Remove the path at the destination
    Del,
    /// Add or update the path with staged content
    Add,
}

impl ActionKind {
    /// Sort precedence (lower runs first)
    pub fn precedence(self) -> u8 {
        match self {
            ActionKind::Del => 0,
            ActionKind::Add => 1,
        }
    }

    /// One-character marker used in previews
    pub fn marker(self) -> char {
        match self {
            ActionKind::Add => '+',
            ActionKind::Del => '-',
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Add => write!(f, "add"),
            ActionKind::Del => write!(f, "del"),
        }
    }
}

/// Immutable (path, kind) pair
///
/// Paths are relative, `/`-separated and never start with `./`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Action {
    path: String,
    kind: ActionKind,
}

impl Action {
    pub fn new(path: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            path: normalize_path(&path.into()),
            kind,
        }
    }

    pub fn add(path: impl Into<String>) -> Self {
        Self::new(path, ActionKind::Add)
    }

    pub fn del(path: impl Into<String>) -> Self {
        Self::new(path, ActionKind::Del)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn is_add(&self) -> bool {
        self.kind == ActionKind::Add
    }

    /// Parent directory of the path (`""` for top-level entries)
    pub fn parent(&self) -> &str {
        self.path.rsplit_once('/').map(|(head, _)| head).unwrap_or("")
    }

    /// Ordering key: (kind precedence, path)
    pub fn sort_key(&self) -> (u8, &str) {
        (self.kind.precedence(), self.path.as_str())
    }
}

impl Ord for Action {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Action {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.marker(), self.path)
    }
}

/// Normalize a relative path: forward slashes, no `./` segments, no empty segments.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Join a parent path and a name with `/`, tolerating an empty parent.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}
