//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod connection;
mod digest;
mod source_type;

pub use connection::{Connection, ConnectionScheme};
pub use digest::{DigestAlgorithm, CHUNK_SIZE};
pub use source_type::SourceType;
