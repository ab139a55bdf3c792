//! Deltaship - incremental deployment of source trees
//!
//! Deltaship keeps a revision record per destination so that each run only
//! transfers what changed since the last successful deployment. Sources
//! are content-hashed trees or git repositories; destinations are local
//! directories, FTP servers or SSH hosts.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

// Re-exports for convenience
pub use application::{DeployOptions, DeployReport, DeployUseCase, LocationOutcome};
pub use domain::entities::{Action, ActionKind, Fingerprint, Revision};
pub use domain::ports::{AutoConsole, Console, Source, Target};
pub use error::{ConfigError, DeployError, DeployResult, RevisionError, RuleError};
