//! Deltaship CLI - incremental deployment to file, FTP and SSH targets
//!
//! Usage: deltaship [OPTIONS] [LOCATIONS]...

use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::error;

use deltaship::logging;
use deltaship::presentation::{create_deploy_use_case, Cli};

fn run(cli: &Cli) -> Result<bool> {
    logging::init(cli.verbose, cli.quiet).map_err(|e| anyhow!("can't set up logging: {}", e))?;

    let use_case = create_deploy_use_case(cli.yes);
    let report = use_case.execute(&cli.deploy_options());

    if !report.is_success() {
        error!("{} location(s) failed", report.failed_count());
    }
    Ok(report.is_success())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
