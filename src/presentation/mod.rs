//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating use cases with infrastructure dependencies
//! - Terminal preview and prompts
//!
//! ## Structure
//!
//! - `cli` - Command line definition
//! - `console` - Terminal implementation of the `Console` port
//! - `factory` - Creates use cases with proper dependencies
//! - `preview` - Action listing rendering

pub mod cli;
pub mod console;
pub mod factory;
pub mod preview;

pub use cli::Cli;
pub use console::TerminalConsole;
pub use factory::create_deploy_use_case;
