//! Repository Implementations
//!
//! - `revision` - JSON revision records

mod revision;

pub use revision::JsonRevisionRepository;
