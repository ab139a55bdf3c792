//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.

use std::path::PathBuf;

use clap::Parser;

use crate::application::DeployOptions;
use crate::infrastructure::config::{DEFAULT_DEFINITION_PATH, DEFAULT_ENVIRONMENT_PATH};

/// Deltaship - incremental deployment to file, FTP and SSH targets
#[derive(Parser, Debug)]
#[command(name = "deltaship")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Locations default to 'default'; use '*' to deploy to every location.")]
pub struct Cli {
    /// Locations to deploy to
    #[arg(value_name = "LOCATIONS")]
    pub names: Vec<String>,

    /// Source tree root
    #[arg(short, long, default_value = ".")]
    pub base: PathBuf,

    /// Definition file, relative to the base directory
    #[arg(short, long, default_value = DEFAULT_DEFINITION_PATH)]
    pub definition: PathBuf,

    /// Environment file, relative to the base directory
    #[arg(short, long, default_value = DEFAULT_ENVIRONMENT_PATH)]
    pub environment: PathBuf,

    /// Force deploy of a file, directory or glob (repeatable)
    #[arg(short, long = "append", value_name = "PATH")]
    pub append: Vec<String>,

    /// Force delete of a file, directory or glob (repeatable)
    #[arg(short, long = "remove", value_name = "PATH")]
    pub remove: Vec<String>,

    /// Origin revision ("" for the empty tree)
    #[arg(short = 'f', long, value_name = "REV")]
    pub rev_from: Option<String>,

    /// Target revision
    #[arg(short = 't', long, value_name = "REV")]
    pub rev_to: Option<String>,

    /// Answer yes to every prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only report warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn deploy_options(&self) -> DeployOptions {
        DeployOptions::new(&self.base)
            .with_definition(&self.definition)
            .with_environment(&self.environment)
            .with_names(self.names.clone())
            .with_append(self.append.clone())
            .with_remove(self.remove.clone())
            .with_rev_from(self.rev_from.clone())
            .with_rev_to(self.rev_to.clone())
            .with_yes(self.yes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["deltaship"]).unwrap();
        assert!(cli.names.is_empty());
        assert_eq!(cli.base, PathBuf::from("."));
        assert_eq!(cli.definition, PathBuf::from(".deltaship.def"));
        assert_eq!(cli.environment, PathBuf::from(".deltaship.env"));
        assert!(!cli.yes);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "deltaship", "staging", "prod", "-b", "site", "-a", "vendor", "--append", "x.js",
            "-r", "old", "-f", "", "-t", "HEAD", "-y", "-vv",
        ])
        .unwrap();

        assert_eq!(cli.names, vec!["staging", "prod"]);
        assert_eq!(cli.base, PathBuf::from("site"));
        assert_eq!(cli.append, vec!["vendor", "x.js"]);
        assert_eq!(cli.remove, vec!["old"]);
        assert_eq!(cli.rev_from.as_deref(), Some(""));
        assert_eq!(cli.rev_to.as_deref(), Some("HEAD"));
        assert!(cli.yes);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["deltaship", "-v", "-q"]).is_err());
    }

    #[test]
    fn deploy_options_carry_flags() {
        let cli = Cli::try_parse_from(["deltaship", "*", "-y", "-r", "cache"]).unwrap();
        let options = cli.deploy_options();
        assert_eq!(options.names, vec!["*"]);
        assert_eq!(options.remove, vec!["cache"]);
        assert!(options.yes);
    }
}
