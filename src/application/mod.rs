//! Application Layer
//!
//! Use cases that orchestrate the deployment flow.
//! This layer:
//! - Depends on Domain layer (entities, ports)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DeployUseCase` - Diff, transform, preview, send and record each location
//!
//! ## Services
//!
//! - `RulePipeline` - User rules applied to every pending action
//! - `append_actions` / `remove_actions` - Manual overrides

pub mod deploy;
pub mod manual;
pub mod rules;

pub use deploy::{DeployOptions, DeployReport, DeployUseCase, LocationOutcome, LocationReport};
pub use manual::{append_actions, remove_actions};
pub use rules::{RuleOutcome, RulePipeline};
