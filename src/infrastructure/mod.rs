//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `config/` - Definition and environment files
//! - `fs/` - Relative-path file helpers and the staging area
//! - `process` - External command helpers
//! - `repositories/` - Revision record persistence
//! - `source/` - Source providers (hash, git)
//! - `target/` - Target providers (file, FTP, SSH)

pub mod config;
pub mod fs;
pub mod process;
pub mod repositories;
pub mod source;
pub mod target;

// Re-export for convenience
pub use fs::StagingArea;
pub use repositories::JsonRevisionRepository;
pub use source::{create_source, GitSource, HashSource};
pub use target::{create_target, FileTarget, FtpTarget, SshTarget};
