//! Staging Area
//!
//! Private temporary directory holding exactly the content that will be
//! transferred. The directory is deleted when the value is dropped, on
//! every exit path.

use std::io;
use std::path::Path;

use tempfile::TempDir;

use super::local;

pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    /// Create a fresh, empty, uniquely named directory
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("deltaship-").tempdir()?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Copy `source_root/relative` into the staging area
    pub fn stage(&self, source_root: &Path, relative: &str) -> io::Result<()> {
        local::duplicate(source_root, self.path(), relative)
    }

    pub fn write(&self, relative: &str, content: &[u8]) -> io::Result<()> {
        local::write(self.path(), relative, content)
    }

    /// Drop staged content for a path
    pub fn cancel(&self, relative: &str) -> io::Result<()> {
        local::remove(self.path(), relative)
    }

    pub fn contains(&self, relative: &str) -> bool {
        local::resolve(self.path(), relative).is_file()
    }
}
