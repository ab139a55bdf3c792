//! Error types for deltaship
//!
//! Uses `thiserror` for library errors. Each layer owns its error enum and
//! `DeployError` gathers them so the orchestrator can log one message per
//! failed location.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::{SourceError, TargetError};

/// Result type alias for deployment operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Configuration errors (base directory, environment/definition files, connection strings)
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Base directory does not exist
    #[error("base directory '{path}' doesn't exist")]
    MissingBaseDirectory { path: PathBuf },

    /// Environment file is required but absent
    #[error("no environment file '{path}' found")]
    MissingEnvironment { path: PathBuf },

    /// TOML syntax or type error
    #[error("invalid configuration in {file}: {message}")]
    Invalid { file: PathBuf, message: String },

    /// Rule pattern is not a valid regular expression
    #[error("invalid rule pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Connection string doesn't match `scheme://...`
    #[error("malformed connection string '{connection}'")]
    MalformedConnection { connection: String },

    /// Connection string uses a scheme no target supports
    #[error("unsupported scheme '{scheme}' in connection string '{connection}'")]
    UnsupportedScheme { scheme: String, connection: String },

    /// Unknown source type in definition
    #[error("unknown source type '{name}', expected 'hash' or 'git'")]
    UnknownSource { name: String },

    /// Unknown digest algorithm in definition
    #[error("unknown hash algorithm '{name}'")]
    UnknownAlgorithm { name: String },

    /// IO error while reading configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Revision record parse errors
#[derive(Error, Debug)]
pub enum RevisionError {
    #[error("malformed revision record: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("revision record must be an object keyed by location name")]
    NotAnObject,

    #[error("can't encode revision record: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Rule pipeline errors
#[derive(Error, Debug)]
pub enum RuleError {
    /// A `run` or `adapt` command failed
    #[error("command '{command}' failed: {message}")]
    Command { command: String, message: String },

    /// Staging area manipulation failed
    #[error("can't process '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level error for one location's deployment
#[derive(Error, Debug)]
pub enum DeployError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error("bad revision record '{path}': {source}")]
    Revision {
        path: String,
        #[source]
        source: RevisionError,
    },

    #[error(transparent)]
    Rule(#[from] RuleError),

    /// Staging or local revision I/O failed
    #[error("IO error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
