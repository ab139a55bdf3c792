//! File System Helpers
//!
//! - `local` - Relative-path copy/remove/list
//! - `staging` - Scoped temporary staging directory

pub mod local;
mod staging;

pub use staging::StagingArea;
