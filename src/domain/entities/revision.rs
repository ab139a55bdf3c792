//! Revision entity - tracks the last deployed fingerprint per location
//!
//! Pure data structure. Serialization lives in `RevisionRepository`.

use std::collections::BTreeMap;

/// Content-hash snapshot of a directory: name → entry
pub type Tree = BTreeMap<String, TreeEntry>;

/// One entry of a content-hash snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEntry {
    /// Regular file with its hex digest
    File(String),
    /// Nested directory
    Directory(Tree),
}

/// Opaque snapshot of a source tree
///
/// Only the source provider that produced a fingerprint interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fingerprint {
    /// Version-control revision identifier
    Revision(String),
    /// Content-hash tree
    Tree(Tree),
}

impl Fingerprint {
    /// Short human-readable form for log lines
    pub fn short(&self) -> String {
        match self {
            Fingerprint::Revision(rev) => rev.chars().take(8).collect(),
            Fingerprint::Tree(tree) => format!("tree of {} entries", count_files(tree)),
        }
    }
}

/// Count regular files reachable from a tree
pub fn count_files(tree: &Tree) -> usize {
    tree.values()
        .map(|entry| match entry {
            TreeEntry::File(_) => 1,
            TreeEntry::Directory(nested) => count_files(nested),
        })
        .sum()
}

/// Mapping from location name to the fingerprint last deployed there
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Revision {
    entries: BTreeMap<String, Fingerprint>,
}

impl Revision {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Fingerprint for a location, `None` if never deployed
    pub fn get(&self, location: &str) -> Option<&Fingerprint> {
        self.entries.get(location)
    }

    /// Replace the fingerprint for a location
    pub fn set(&mut self, location: impl Into<String>, fingerprint: Fingerprint) {
        self.entries.insert(location.into(), fingerprint);
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Fingerprint)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
