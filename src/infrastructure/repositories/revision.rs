//! JSON Revision Repository
//!
//! Revision records are JSON objects keyed by location name. Git
//! fingerprints are strings; hash fingerprints are nested objects whose
//! leaves are hex digests.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Fingerprint, Revision, Tree, TreeEntry};
use crate::error::{DeployError, DeployResult, RevisionError};

/// JSON representation of a fingerprint or tree entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum JsonEntry {
    Leaf(String),
    Node(BTreeMap<String, JsonEntry>),
}

impl JsonEntry {
    fn from_tree(tree: &Tree) -> BTreeMap<String, JsonEntry> {
        tree.iter()
            .map(|(name, entry)| {
                let json = match entry {
                    TreeEntry::File(digest) => JsonEntry::Leaf(digest.clone()),
                    TreeEntry::Directory(nested) => JsonEntry::Node(Self::from_tree(nested)),
                };
                (name.clone(), json)
            })
            .collect()
    }

    fn into_tree(map: BTreeMap<String, JsonEntry>) -> Tree {
        map.into_iter()
            .map(|(name, json)| {
                let entry = match json {
                    JsonEntry::Leaf(digest) => TreeEntry::File(digest),
                    JsonEntry::Node(nested) => TreeEntry::Directory(Self::into_tree(nested)),
                };
                (name, entry)
            })
            .collect()
    }
}

/// Revision record stored as JSON, on the destination or on local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRevisionRepository;

impl JsonRevisionRepository {
    pub fn new() -> Self {
        Self
    }

    /// Parse a revision blob; empty or blank content is an empty record
    pub fn parse(&self, bytes: &[u8]) -> Result<Revision, RevisionError> {
        let text = String::from_utf8_lossy(bytes);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Revision::new());
        }
        if !trimmed.starts_with('{') {
            return Err(RevisionError::NotAnObject);
        }

        let raw: BTreeMap<String, JsonEntry> = serde_json::from_str(trimmed)?;

        let mut revision = Revision::new();
        for (location, json) in raw {
            let fingerprint = match json {
                JsonEntry::Leaf(commit) => Fingerprint::Revision(commit),
                JsonEntry::Node(map) => Fingerprint::Tree(JsonEntry::into_tree(map)),
            };
            revision.set(location, fingerprint);
        }

        Ok(revision)
    }

    pub fn serialize(&self, revision: &Revision) -> Result<Vec<u8>, RevisionError> {
        let raw: BTreeMap<&str, JsonEntry> = revision
            .entries()
            .map(|(location, fingerprint)| {
                let json = match fingerprint {
                    Fingerprint::Revision(commit) => JsonEntry::Leaf(commit.clone()),
                    Fingerprint::Tree(tree) => JsonEntry::Node(JsonEntry::from_tree(tree)),
                };
                (location, json)
            })
            .collect();

        serde_json::to_vec(&raw).map_err(RevisionError::Encode)
    }

    /// Load from local disk; a missing file is an empty record
    pub fn load(&self, path: &Path) -> DeployResult<Revision> {
        match fs::read(path) {
            Ok(bytes) => self.parse(&bytes).map_err(|source| DeployError::Revision {
                path: path.display().to_string(),
                source,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Revision::new()),
            Err(source) => Err(DeployError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn save(&self, revision: &Revision, path: &Path) -> DeployResult<()> {
        let blob = self
            .serialize(revision)
            .map_err(|source| DeployError::Revision {
                path: path.display().to_string(),
                source,
            })?;

        let io_error = |source| DeployError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, blob).map_err(io_error)
    }
}
