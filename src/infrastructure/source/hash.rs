//! Content-Hash Source
//!
//! Fingerprints a tree as nested mappings of file digests and diffs two
//! snapshots structurally. Type changes (file ↔ directory) are expressed as
//! full subtree replacement.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::path::Path;

use tracing::{debug, warn};

use crate::domain::entities::{
    join_path, normalize_path, Action, Fingerprint, HashOptions, Tree, TreeEntry,
};
use crate::domain::ports::{Source, SourceError};
use crate::infrastructure::fs::local;

pub struct HashSource {
    options: HashOptions,
    /// Relative paths left out of snapshots
    excluded: Vec<String>,
}

impl HashSource {
    pub fn new(options: HashOptions) -> Self {
        Self {
            options,
            excluded: Vec::new(),
        }
    }

    pub fn with_excluded(mut self, paths: &[String]) -> Self {
        self.excluded = paths.iter().map(|p| normalize_path(p)).collect();
        self
    }

    fn snapshot(&self, directory: &Path, relative: &str) -> Result<Tree, SourceError> {
        let mut tree = Tree::new();
        let entries = fs::read_dir(directory).map_err(|e| SourceError::io(directory, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| SourceError::io(directory, e))?;
            let path = entry.path();

            let Ok(name) = entry.file_name().into_string() else {
                warn!("Skipping non UTF-8 file name '{}'", path.display());
                continue;
            };

            let child = join_path(relative, &name);
            if self.excluded.contains(&child) {
                debug!("Excluding '{}' from snapshot", child);
                continue;
            }

            let is_link = entry
                .file_type()
                .map_err(|e| SourceError::io(&path, e))?
                .is_symlink();

            if is_link && !self.options.follow_symlinks {
                continue;
            }

            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) if is_link => {
                    debug!("Skipping dangling link '{}': {}", path.display(), e);
                    continue;
                }
                Err(e) => return Err(SourceError::io(&path, e)),
            };

            if metadata.is_dir() {
                tree.insert(name, TreeEntry::Directory(self.snapshot(&path, &child)?));
            } else if metadata.is_file() {
                tree.insert(name, TreeEntry::File(self.digest(&path)?));
            }
        }

        Ok(tree)
    }

    fn digest(&self, path: &Path) -> Result<String, SourceError> {
        let file = File::open(path).map_err(|e| SourceError::io(path, e))?;
        self.options
            .algorithm
            .digest_reader(file)
            .map_err(|e| SourceError::io(path, e))
    }

    fn stage_add(
        &self,
        base: &Path,
        work: &Path,
        path: String,
        actions: &mut Vec<Action>,
    ) -> Result<(), SourceError> {
        local::duplicate(base, work, &path).map_err(|e| SourceError::io(local::resolve(base, &path), e))?;
        actions.push(Action::add(path));
        Ok(())
    }

    fn recurse(
        &self,
        base: &Path,
        work: &Path,
        parent: &str,
        from: &Tree,
        to: &Tree,
        actions: &mut Vec<Action>,
    ) -> Result<(), SourceError> {
        let empty = Tree::new();
        let names: BTreeSet<&String> = from.keys().chain(to.keys()).collect();

        for name in names {
            let path = join_path(parent, name);

            match (from.get(name), to.get(name)) {
                // Still a directory
                (Some(TreeEntry::Directory(f)), Some(TreeEntry::Directory(t))) => {
                    self.recurse(base, work, &path, f, t, actions)?;
                }
                // Directory replaced by a file or removed
                (Some(TreeEntry::Directory(f)), entry_to) => {
                    self.recurse(base, work, &path, f, &empty, actions)?;
                    if let Some(TreeEntry::File(_)) = entry_to {
                        self.stage_add(base, work, path, actions)?;
                    }
                }
                // File replaced by a directory, or new directory
                (entry_from, Some(TreeEntry::Directory(t))) => {
                    if let Some(TreeEntry::File(_)) = entry_from {
                        actions.push(Action::del(path.clone()));
                    }
                    self.recurse(base, work, &path, &empty, t, actions)?;
                }
                (entry_from, entry_to) if entry_from != entry_to => {
                    if entry_to.is_some() {
                        self.stage_add(base, work, path, actions)?;
                    } else {
                        actions.push(Action::del(path));
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn as_tree<'a>(fingerprint: &'a Fingerprint, empty: &'a Tree) -> Result<&'a Tree, SourceError> {
        match fingerprint {
            Fingerprint::Tree(tree) => Ok(tree),
            Fingerprint::Revision(rev) if rev.is_empty() => Ok(empty),
            Fingerprint::Revision(rev) => Err(SourceError::IncompatibleFingerprint {
                provider: "hash",
                found: rev.clone(),
            }),
        }
    }
}

impl Source for HashSource {
    fn name(&self) -> &'static str {
        "hash"
    }

    fn current(&self, base: &Path) -> Result<Fingerprint, SourceError> {
        self.snapshot(base, "").map(Fingerprint::Tree)
    }

    fn diff(
        &self,
        base: &Path,
        work: &Path,
        from: Option<&Fingerprint>,
        to: &Fingerprint,
    ) -> Result<Vec<Action>, SourceError> {
        let empty = Tree::new();
        let tree_from = match from {
            Some(fingerprint) => Self::as_tree(fingerprint, &empty)?,
            None => &empty,
        };
        let tree_to = Self::as_tree(to, &empty)?;

        let mut actions = Vec::new();
        self.recurse(base, work, "", tree_from, tree_to, &mut actions)?;
        Ok(actions)
    }
}
