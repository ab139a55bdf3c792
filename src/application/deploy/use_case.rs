//! Deploy Use Case
//!
//! Per location:
//! 1. Read the revision record (destination or local disk)
//! 2. Resolve origin and target fingerprints
//! 3. Diff into a fresh staging area, add manual overrides
//! 4. Run the rule pipeline
//! 5. Preview, confirm, send
//! 6. Persist the new revision
//!
//! Subsidiaries are deployed afterwards whatever the location's outcome.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{error, info, warn};

use crate::application::manual::{append_actions, remove_actions};
use crate::application::rules::RulePipeline;
use crate::domain::entities::{Action, Definition, Environment, Fingerprint, Location, Revision};
use crate::domain::ports::{Console, Target};
use crate::error::{ConfigError, DeployError, DeployResult};
use crate::infrastructure::config::{load_definition, load_environment, ConfigWarning};
use crate::infrastructure::fs::{local, StagingArea};
use crate::infrastructure::repositories::JsonRevisionRepository;
use crate::infrastructure::source::create_source;
use crate::infrastructure::target::create_target;

use super::options::DeployOptions;
use super::result::{DeployReport, LocationOutcome};

/// Overrides that only apply to the top-level tree
struct RootOverrides<'o> {
    append: &'o [String],
    remove: &'o [String],
    rev_from: Option<&'o str>,
    rev_to: Option<&'o str>,
}

impl RootOverrides<'static> {
    const NONE: Self = RootOverrides {
        append: &[],
        remove: &[],
        rev_from: None,
        rev_to: None,
    };
}

/// Deploy use case, parameterized by the console used for preview and prompts
pub struct DeployUseCase<C: Console> {
    console: C,
    revisions: JsonRevisionRepository,
}

impl<C: Console> DeployUseCase<C> {
    pub fn new(console: C) -> Self {
        Self {
            console,
            revisions: JsonRevisionRepository::new(),
        }
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    /// Deploy every requested location, then their subsidiaries
    pub fn execute(&self, options: &DeployOptions) -> DeployReport {
        let mut report = DeployReport::new();
        let overrides = RootOverrides {
            append: &options.append,
            remove: &options.remove,
            rev_from: options.rev_from.as_deref(),
            rev_to: options.rev_to.as_deref(),
        };

        self.deploy_tree(options, &options.base, &options.names, &overrides, &mut report);
        report
    }

    fn deploy_tree(
        &self,
        options: &DeployOptions,
        base: &Path,
        names: &[String],
        overrides: &RootOverrides<'_>,
        report: &mut DeployReport,
    ) {
        let (environment, definition) = match self.load_tree(options, base) {
            Ok(loaded) => loaded,
            Err(e) => {
                error!("{}", e);
                for name in Environment::new().expand_names(names) {
                    report.record(base, name, LocationOutcome::Failed);
                }
                return;
            }
        };

        for name in environment.expand_names(names) {
            let Some(location) = environment.get(&name) else {
                error!("There is no location '{}' in environment file", name);
                report.record(base, name, LocationOutcome::Failed);
                continue;
            };

            if location.is_inert() {
                info!(location = %location.name, "No connection and no subsidiaries, nothing to do");
                report.record(base, &location.name, LocationOutcome::Success);
                continue;
            }

            let outcome = match &location.connection {
                None => LocationOutcome::Success,
                Some(connection) => {
                    match self.deploy_location(options, base, &definition, location, connection, overrides) {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            error!(location = %location.name, "Deployment failed: {}", e);
                            LocationOutcome::Failed
                        }
                    }
                }
            };
            report.record(base, &location.name, outcome);

            for (sub_path, sub_names) in &location.subsidiaries {
                let sub_base = local::resolve(base, sub_path);
                info!("Entering subsidiary path '{}'", sub_base.display());
                self.deploy_tree(options, &sub_base, sub_names, &RootOverrides::NONE, report);
                info!("Leaving subsidiary path '{}'", sub_base.display());
            }
        }
    }

    fn load_tree(
        &self,
        options: &DeployOptions,
        base: &Path,
    ) -> Result<(Environment, Definition), ConfigError> {
        if !base.is_dir() {
            return Err(ConfigError::MissingBaseDirectory {
                path: base.to_path_buf(),
            });
        }

        let (environment, warnings) = load_environment(&base.join(&options.environment))?;
        log_warnings(&warnings);

        let (definition, warnings) = load_definition(&base.join(&options.definition))?;
        log_warnings(&warnings);

        Ok((environment, definition))
    }

    fn read_revision(
        &self,
        base: &Path,
        location: &Location,
        target: &dyn Target,
    ) -> DeployResult<Revision> {
        if location.local {
            return self.revisions.load(&local::resolve(base, &location.state));
        }

        let bytes = target.read(&location.state)?;
        self.revisions
            .parse(&bytes)
            .map_err(|source| DeployError::Revision {
                path: location.state.clone(),
                source,
            })
    }

    fn deploy_location(
        &self,
        options: &DeployOptions,
        base: &Path,
        definition: &Definition,
        location: &Location,
        connection: &str,
        overrides: &RootOverrides<'_>,
    ) -> DeployResult<LocationOutcome> {
        let name = location.name.as_str();
        let target = create_target(connection, &location.options, base)?;
        info!(location = name, "Deploying to {}", target.display_name());

        let mut revision = self.read_revision(base, location, target.as_ref())?;
        let excluded: Vec<String> = target
            .local_root()
            .and_then(|root| nested_destination(base, root))
            .into_iter()
            .collect();
        for path in &excluded {
            warn!(
                location = name,
                "Destination '{}' lies inside the source tree, excluding it", path
            );
        }
        let source = create_source(definition, base, &excluded)?;

        let from = match overrides.rev_from {
            Some(rev) => Some(Fingerprint::Revision(rev.to_string())),
            None => revision.get(name).cloned(),
        };

        if from.is_none()
            && !options.yes
            && !self.console.confirm(&format!(
                "No current revision found for location '{}', maybe you're deploying for the first time. Initiate full deploy?",
                name
            ))
        {
            info!(location = name, "Skipped");
            return Ok(LocationOutcome::Skipped);
        }

        let to = match overrides.rev_to {
            Some(rev) => Fingerprint::Revision(rev.to_string()),
            None => source.current(base)?,
        };
        revision.set(name, to.clone());

        let staging = StagingArea::new().map_err(|source| DeployError::Io {
            path: std::env::temp_dir(),
            source,
        })?;

        let mut actions = source.diff(base, staging.path(), from.as_ref(), &to)?;

        let follow_links = definition.hash.follow_symlinks;
        let append: Vec<String> = location.append_files.iter().chain(overrides.append).cloned().collect();
        let remove: Vec<String> = location.remove_files.iter().chain(overrides.remove).cloned().collect();
        actions.extend(append_actions(base, &staging, &append, follow_links));
        actions.extend(remove_actions(base, &remove, follow_links));
        // Each pending action reaches the rules once
        let actions: Vec<Action> = actions
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut ignored = vec![
            options.definition.to_string_lossy().into_owned(),
            options.environment.to_string_lossy().into_owned(),
        ];
        if location.local {
            ignored.push(location.state.clone());
        }
        let pipeline = RulePipeline::new(base, definition.rules.clone()).with_ignored(ignored)?;
        let mut actions = pipeline.process(&staging, actions)?;

        if from.as_ref() != Some(&to) && !location.local {
            let blob = self
                .revisions
                .serialize(&revision)
                .map_err(|source| DeployError::Revision {
                    path: location.state.clone(),
                    source,
                })?;
            staging
                .write(&location.state, &blob)
                .map_err(|source| DeployError::Io {
                    path: local::resolve(staging.path(), &location.state),
                    source,
                })?;
            actions.push(Action::add(location.state.as_str()));
        }

        if actions.is_empty() {
            info!(location = name, "Nothing to deploy");
            return Ok(LocationOutcome::Success);
        }

        self.console.preview(name, &actions);

        if !options.yes && !self.console.confirm("Execute synchronization?") {
            info!(location = name, "Synchronization declined");
            return Ok(LocationOutcome::Success);
        }

        actions.sort();
        actions.dedup();
        target.send(staging.path(), &actions)?;

        if location.local {
            self.revisions
                .save(&revision, &local::resolve(base, &location.state))?;
        }

        info!(location = name, "Deployment done ({} action(s))", actions.len());
        Ok(LocationOutcome::Success)
    }
}

/// Path of a local destination relative to `base`, when it lies strictly inside it
fn nested_destination(base: &Path, root: &Path) -> Option<String> {
    let base = base.canonicalize().ok()?;
    let root = root.canonicalize().ok()?;
    let relative = root.strip_prefix(&base).ok()?;
    let relative = relative.to_str()?.replace('\\', "/");
    (!relative.is_empty()).then_some(relative)
}

fn log_warnings(warnings: &[ConfigWarning]) {
    for warning in warnings {
        warn!("{}", warning);
    }
}
