//! Domain Entities
//!
//! - `Action` - One file-level operation
//! - `Revision` - Last deployed fingerprint per location
//! - `Location` / `Environment` - Deployment destinations
//! - `Definition` / `Rule` - Source selection and transformation rules

mod action;
mod definition;
mod location;
mod revision;
mod rule;

pub use action::{join_path, normalize_path, Action, ActionKind};
pub use definition::{Definition, HashOptions};
pub use location::{Environment, Location, LocationOptions, DEFAULT_STATE_PATH};
pub use revision::{count_files, Fingerprint, Revision, Tree, TreeEntry};
pub use rule::Rule;
