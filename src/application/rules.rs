//! Rule Pipeline
//!
//! Runs every pending action through the first matching rule. Rules can
//! run a command, stage linked files, drop an action, rename it or filter
//! its staged content.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::domain::entities::{normalize_path, Action, ActionKind, Rule};
use crate::error::{ConfigError, RuleError};
use crate::infrastructure::fs::{local, StagingArea};
use crate::infrastructure::process;

/// Result of one action going through the pipeline
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RuleOutcome {
    /// Replacement actions (empty when dropped)
    pub actions: Vec<Action>,
    /// Paths whose staged content must be discarded
    pub cancels: Vec<String>,
}

impl RuleOutcome {
    fn pass(action: &Action) -> Self {
        Self {
            actions: vec![action.clone()],
            cancels: Vec::new(),
        }
    }
}

pub struct RulePipeline<'a> {
    base: &'a Path,
    rules: Vec<Rule>,
}

impl<'a> RulePipeline<'a> {
    pub fn new(base: &'a Path, rules: Vec<Rule>) -> Self {
        Self { base, rules }
    }

    /// Always drop these paths, ahead of any declared rule
    pub fn with_ignored<I, S>(mut self, paths: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builtin = paths
            .into_iter()
            .map(|p| Rule::ignore_path(&normalize_path(p.as_ref())))
            .collect::<Result<Vec<_>, _>>()?;
        builtin.append(&mut self.rules);
        self.rules = builtin;
        Ok(self)
    }

    /// Transform one action; `seen` de-duplicates side effects within a run
    pub fn apply(
        &self,
        work: &Path,
        action: &Action,
        seen: &mut HashSet<String>,
    ) -> Result<RuleOutcome, RuleError> {
        let Some(rule) = self.rules.iter().find(|r| r.matches(action.path())) else {
            return Ok(RuleOutcome::pass(action));
        };

        debug!("Rule '{}' matches '{}'", rule.pattern(), action.path());

        if let Some(command) = &rule.run {
            if seen.insert(format!("run:{}", command)) {
                self.run(command)?;
            }
        }

        let mut outcome = RuleOutcome::default();

        for link in &rule.link {
            let link = normalize_path(link);
            if seen.insert(format!("link:{}", link)) {
                local::duplicate(self.base, work, &link).map_err(|source| RuleError::Io {
                    path: link.clone(),
                    source,
                })?;
                outcome.actions.push(Action::add(link));
            }
        }

        if rule.ignore {
            outcome.cancels.push(action.path().to_string());
            return Ok(outcome);
        }

        let destination = normalize_path(&rule.renamed(action.path()));

        if action.kind() == ActionKind::Add {
            if destination != action.path() {
                Self::relocate(work, action.path(), &destination)?;
            }
            if let Some(command) = &rule.adapt {
                self.adapt(work, &destination, command)?;
            }
        }

        outcome.actions.push(Action::new(destination, action.kind()));
        Ok(outcome)
    }

    /// Apply every action, then drop cancelled content; result is sorted and unique
    pub fn process(
        &self,
        staging: &StagingArea,
        actions: Vec<Action>,
    ) -> Result<Vec<Action>, RuleError> {
        let mut seen = HashSet::new();
        let mut processed = Vec::new();
        let mut cancels = HashSet::new();

        for action in &actions {
            let outcome = self.apply(staging.path(), action, &mut seen)?;
            processed.extend(outcome.actions);
            cancels.extend(outcome.cancels);
        }

        for cancel in &cancels {
            if let Err(e) = staging.cancel(cancel) {
                warn!("Can't discard staged file '{}': {}", cancel, e);
            }
        }

        Ok(processed
            .into_iter()
            .filter(|a| !(a.is_add() && cancels.contains(a.path())))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect())
    }

    fn run(&self, command: &str) -> Result<(), RuleError> {
        debug!("Running '{}' in '{}'", command, self.base.display());

        let output = process::capture(&mut process::shell(command, self.base)).map_err(|e| {
            RuleError::Command {
                command: command.to_string(),
                message: e.to_string(),
            }
        })?;

        if !output.status.success() {
            return Err(RuleError::Command {
                command: command.to_string(),
                message: process::failure_message(&output),
            });
        }
        Ok(())
    }

    fn relocate(work: &Path, from: &str, to: &str) -> Result<(), RuleError> {
        let io_error = |source| RuleError::Io {
            path: from.to_string(),
            source,
        };
        let target = local::resolve(work, to);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::rename(local::resolve(work, from), &target).map_err(io_error)?;
        local::prune_empty_parents(work, from);
        Ok(())
    }

    fn adapt(&self, work: &Path, path: &str, command: &str) -> Result<(), RuleError> {
        let staged = local::resolve(work, path);
        let io_error = |source| RuleError::Io {
            path: path.to_string(),
            source,
        };

        let input = fs::read(&staged).map_err(io_error)?;
        let output = process::filter(&mut process::shell(command, self.base), &input).map_err(
            |e| RuleError::Command {
                command: command.to_string(),
                message: e.to_string(),
            },
        )?;

        if !output.status.success() {
            return Err(RuleError::Command {
                command: command.to_string(),
                message: process::failure_message(&output),
            });
        }

        fs::write(&staged, output.stdout).map_err(io_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::fs::local::write;
    use tempfile::tempdir;

    fn rule(pattern: &str) -> Rule {
        Rule::new(pattern).unwrap()
    }

    #[test]
    fn identity_pipeline_passes_through() {
        let base = tempdir().unwrap();
        let staging = StagingArea::new().unwrap();
        staging.write("a.txt", b"a").unwrap();

        let pipeline = RulePipeline::new(base.path(), Vec::new());
        let mut seen = HashSet::new();
        let outcome = pipeline
            .apply(staging.path(), &Action::add("a.txt"), &mut seen)
            .unwrap();

        assert_eq!(outcome, RuleOutcome::pass(&Action::add("a.txt")));
        assert!(outcome.cancels.is_empty());
    }

    #[test]
    fn ignore_drops_action_and_staged_content() {
        let base = tempdir().unwrap();
        let staging = StagingArea::new().unwrap();
        staging.write("secret.env", b"x").unwrap();
        staging.write("a.txt", b"a").unwrap();

        let mut ignore = rule(r"\.env$");
        ignore.ignore = true;
        let pipeline = RulePipeline::new(base.path(), vec![ignore]);

        let actions = pipeline
            .process(&staging, vec![Action::add("secret.env"), Action::add("a.txt")])
            .unwrap();

        assert_eq!(actions, vec![Action::add("a.txt")]);
        assert!(!staging.contains("secret.env"));
    }

    #[test]
    fn builtin_ignores_come_first() {
        let base = tempdir().unwrap();
        let staging = StagingArea::new().unwrap();
        staging.write(".deltaship.env", b"x").unwrap();

        let mut rename = rule(".*");
        rename.rename = Some("out/$0".to_string());
        let pipeline = RulePipeline::new(base.path(), vec![rename])
            .with_ignored([".deltaship.env", "./.deltaship.def"])
            .unwrap();

        let actions = pipeline
            .process(
                &staging,
                vec![Action::add(".deltaship.env"), Action::del(".deltaship.def")],
            )
            .unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn rename_moves_staged_content() {
        let base = tempdir().unwrap();
        let staging = StagingArea::new().unwrap();
        staging.write("src/app.js", b"js").unwrap();

        let mut rename = rule(r"^src/(.*)$");
        rename.rename = Some("public/$1".to_string());
        let pipeline = RulePipeline::new(base.path(), vec![rename]);

        let actions = pipeline
            .process(&staging, vec![Action::add("src/app.js"), Action::del("src/old.js")])
            .unwrap();

        assert_eq!(
            actions,
            vec![Action::del("public/old.js"), Action::add("public/app.js")]
        );
        assert!(staging.contains("public/app.js"));
        assert!(!staging.contains("src/app.js"));
    }

    #[test]
    fn link_stages_once_per_run() {
        let base = tempdir().unwrap();
        write(base.path(), "css/site.css", b"css").unwrap();
        let staging = StagingArea::new().unwrap();

        let mut link = rule(r"\.less$");
        link.link = vec!["css/site.css".to_string()];
        link.ignore = true;
        let pipeline = RulePipeline::new(base.path(), vec![link]);

        let actions = pipeline
            .process(
                &staging,
                vec![Action::add("less/a.less"), Action::add("less/b.less")],
            )
            .unwrap();

        assert_eq!(actions, vec![Action::add("css/site.css")]);
        assert!(staging.contains("css/site.css"));
    }

    #[test]
    fn missing_link_is_an_error() {
        let base = tempdir().unwrap();
        let staging = StagingArea::new().unwrap();

        let mut link = rule(".*");
        link.link = vec!["nope.css".to_string()];
        let pipeline = RulePipeline::new(base.path(), vec![link]);

        let err = pipeline
            .process(&staging, vec![Action::del("x")])
            .unwrap_err();
        assert!(matches!(err, RuleError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn run_executes_once_in_base() {
        let base = tempdir().unwrap();
        let staging = StagingArea::new().unwrap();

        let mut run = rule(r"\.txt$");
        run.run = Some("echo x >> ran.log".to_string());
        let pipeline = RulePipeline::new(base.path(), vec![run]);

        pipeline
            .process(&staging, vec![Action::del("a.txt"), Action::del("b.txt")])
            .unwrap();

        assert_eq!(fs::read_to_string(base.path().join("ran.log")).unwrap(), "x\n");
    }

    #[cfg(unix)]
    #[test]
    fn failing_run_is_an_error() {
        let base = tempdir().unwrap();
        let staging = StagingArea::new().unwrap();

        let mut run = rule(".*");
        run.run = Some("exit 2".to_string());
        let pipeline = RulePipeline::new(base.path(), vec![run]);

        let err = pipeline.process(&staging, vec![Action::del("a")]).unwrap_err();
        assert!(matches!(err, RuleError::Command { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn adapt_filters_added_content_only() {
        let base = tempdir().unwrap();
        let staging = StagingArea::new().unwrap();
        staging.write("a.txt", b"hello").unwrap();

        let mut adapt = rule(r"\.txt$");
        adapt.adapt = Some("tr a-z A-Z".to_string());
        let pipeline = RulePipeline::new(base.path(), vec![adapt]);

        let actions = pipeline
            .process(&staging, vec![Action::add("a.txt"), Action::del("gone.txt")])
            .unwrap();

        assert_eq!(actions, vec![Action::del("gone.txt"), Action::add("a.txt")]);
        assert_eq!(fs::read(staging.path().join("a.txt")).unwrap(), b"HELLO");
    }

    #[test]
    fn duplicates_are_collapsed() {
        let base = tempdir().unwrap();
        let staging = StagingArea::new().unwrap();
        staging.write("a.txt", b"a").unwrap();

        let pipeline = RulePipeline::new(base.path(), Vec::new());
        let actions = pipeline
            .process(&staging, vec![Action::add("a.txt"), Action::add("a.txt")])
            .unwrap();
        assert_eq!(actions, vec![Action::add("a.txt")]);
    }
}
