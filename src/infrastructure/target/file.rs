//! Local Directory Target
//!
//! Replays actions with plain filesystem copies under a destination directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::entities::{Action, ActionKind};
use crate::domain::ports::{group_by_parent, Target, TargetError};
use crate::infrastructure::fs::local;

pub struct FileTarget {
    directory: PathBuf,
}

impl FileTarget {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn transfer_error(path: &str, error: io::Error) -> TargetError {
        TargetError::Transfer {
            path: path.to_string(),
            message: error.to_string(),
        }
    }
}

impl Target for FileTarget {
    fn display_name(&self) -> String {
        format!("file://{}", self.directory.display())
    }

    fn local_root(&self) -> Option<&Path> {
        Some(self.directory.as_path())
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, TargetError> {
        match fs::read(local::resolve(&self.directory, path)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(Self::transfer_error(path, e)),
        }
    }

    fn send(&self, work: &Path, actions: &[Action]) -> Result<(), TargetError> {
        fs::create_dir_all(&self.directory).map_err(|e| TargetError::NoConnection {
            target: self.display_name(),
            message: e.to_string(),
        })?;

        for (parent, group) in group_by_parent(actions) {
            let mut parent_ready = false;

            for action in group {
                debug!("{} {}", self.display_name(), action);
                match action.kind() {
                    ActionKind::Add => {
                        let staged = local::resolve(work, action.path());
                        if !staged.is_file() {
                            return Err(TargetError::Staging {
                                path: staged,
                                source: io::Error::from(io::ErrorKind::NotFound),
                            });
                        }
                        if !parent_ready {
                            fs::create_dir_all(local::resolve(&self.directory, parent))
                                .map_err(|e| Self::transfer_error(parent, e))?;
                            parent_ready = true;
                        }
                        fs::copy(&staged, local::resolve(&self.directory, action.path()))
                            .map_err(|e| Self::transfer_error(action.path(), e))?;
                    }
                    ActionKind::Del => {
                        local::remove(&self.directory, action.path())
                            .map_err(|e| Self::transfer_error(action.path(), e))?;
                        // Pruning may have removed the group's directory
                        parent_ready = false;
                    }
                }
            }
        }

        Ok(())
    }
}
