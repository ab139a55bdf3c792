//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod console;
pub mod source;
pub mod target;

pub use console::{AutoConsole, Console};
pub use source::{Source, SourceError};
pub use target::{ancestors, group_by_parent, Target, TargetError};
