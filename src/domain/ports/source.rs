//! Source Port
//!
//! Computes fingerprints of a source tree and the actions between two of them.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::entities::{Action, Fingerprint};

/// Errors raised by source providers
#[derive(Error, Debug)]
pub enum SourceError {
    /// Revision can't be resolved by the provider
    #[error("unknown revision '{revision}'")]
    UnknownRevision { revision: String },

    /// Tree has no current revision (e.g. empty repository)
    #[error("can't find current revision in '{path}'")]
    NoCurrentRevision { path: PathBuf },

    /// Fingerprint was produced by a different provider
    #[error("corrupted {provider} revision: {found}")]
    IncompatibleFingerprint { provider: &'static str, found: String },

    /// External command failed
    #[error("command '{command}' failed: {message}")]
    Command { command: String, message: String },

    /// File couldn't be read or staged
    #[error("can't read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SourceError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Strategy computing source state and diffs
///
/// Implementations:
/// - `HashSource`: content-hash tree snapshots
/// - `GitSource`: git history
pub trait Source {
    /// Provider name (for logging)
    fn name(&self) -> &'static str;

    /// Fingerprint of the tree as it exists right now
    fn current(&self, base: &Path) -> Result<Fingerprint, SourceError>;

    /// Actions transforming a tree matching `from` into one matching `to`
    ///
    /// Content of every added path is staged into `work`. `None` for `from`
    /// means nothing was deployed yet.
    fn diff(
        &self,
        base: &Path,
        work: &Path,
        from: Option<&Fingerprint>,
        to: &Fingerprint,
    ) -> Result<Vec<Action>, SourceError>;
}
