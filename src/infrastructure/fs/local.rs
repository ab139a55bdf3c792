//! Local File Operations
//!
//! Copy, remove and list files addressed by `/`-separated relative paths.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::domain::entities::normalize_path;

/// Resolve a relative path under a root
pub fn resolve(root: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(root.to_path_buf(), |acc, segment| acc.join(segment))
}

/// Express `path` relative to `root` with forward slashes
pub fn to_relative(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    Some(normalize_path(&relative.to_string_lossy()))
}

/// Copy `source_root/relative` to `target_root/relative`, creating parents
pub fn duplicate(source_root: &Path, target_root: &Path, relative: &str) -> io::Result<()> {
    let source = resolve(source_root, relative);
    let target = resolve(target_root, relative);

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::copy(&source, &target).map(|_| ())
}

/// Write bytes to `root/relative`, creating parents
pub fn write(root: &Path, relative: &str, content: &[u8]) -> io::Result<()> {
    let target = resolve(root, relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(target, content)
}

/// Remove a file or directory tree; a missing path is not an error
///
/// Parent directories left empty are pruned up to (not including) `root`.
pub fn remove(root: &Path, relative: &str) -> io::Result<()> {
    let target = resolve(root, relative);

    let result = match fs::symlink_metadata(&target) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(&target),
        Ok(_) => fs::remove_file(&target),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    prune_empty_parents(root, relative);
    Ok(())
}

/// Remove empty ancestors of `relative`, stopping at the first non-empty one
pub fn prune_empty_parents(root: &Path, relative: &str) {
    let mut current = normalize_path(relative);

    while let Some((parent, _)) = current.rsplit_once('/') {
        if fs::remove_dir(resolve(root, parent)).is_err() {
            break;
        }
        current = parent.to_string();
    }
}

/// Every regular file under `root/relative`, as paths relative to `root`, sorted
pub fn list_files(root: &Path, relative: &str, follow_links: bool) -> io::Result<Vec<String>> {
    let start = resolve(root, relative);
    let mut files = Vec::new();

    for entry in WalkBuilder::new(&start)
        .standard_filters(false)
        .hidden(false)
        .follow_links(follow_links)
        .build()
    {
        let entry = entry.map_err(|e| io::Error::other(e.to_string()))?;
        if entry.file_type().is_some_and(|t| t.is_file()) {
            if let Some(rel) = to_relative(root, entry.path()) {
                files.push(rel);
            }
        }
    }

    files.sort();
    Ok(files)
}
