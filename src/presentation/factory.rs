//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.

use crate::application::DeployUseCase;
use crate::domain::ports::{AutoConsole, Console};

use super::console::TerminalConsole;

/// Deploy use case with the console chosen at runtime
pub type ConcreteDeployUseCase = DeployUseCase<Box<dyn Console>>;

/// Auto-confirming console for `--yes`, terminal console otherwise
pub fn create_deploy_use_case(yes: bool) -> ConcreteDeployUseCase {
    let console: Box<dyn Console> = if yes {
        Box::new(AutoConsole::yes())
    } else {
        Box::new(TerminalConsole::new())
    };

    DeployUseCase::new(console)
}
