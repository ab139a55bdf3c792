//! Deploy Module
//!
//! Orchestrates deployment of a source tree to its named locations.
//!
//! ## Structure
//!
//! - `options` - Run inputs (`DeployOptions`)
//! - `result` - Per-location outcomes (`DeployReport`)
//! - `use_case` - Orchestration (`DeployUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use deltaship::application::deploy::{DeployOptions, DeployUseCase};
//! use deltaship::domain::ports::AutoConsole;
//!
//! let use_case = DeployUseCase::new(AutoConsole::yes());
//! let report = use_case.execute(&DeployOptions::new("site").with_names(vec!["staging".into()]));
//! ```

mod options;
mod result;
mod use_case;

pub use options::DeployOptions;
pub use result::{DeployReport, LocationOutcome, LocationReport};
pub use use_case::DeployUseCase;
