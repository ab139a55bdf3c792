//! Domain Layer
//!
//! Deployment concepts without transport or process dependencies.
//!
//! ## Structure
//!
//! - `entities/` - Action, Revision, Location, Definition, Rule
//! - `value_objects/` - Connection strings, digest algorithms, source types
//! - `ports/` - Source, Target and Console interfaces

pub mod entities;
pub mod ports;
pub mod value_objects;
