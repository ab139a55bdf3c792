//! Deploy Result
//!
//! Per-location outcomes of a run, subsidiaries included.

use std::fmt;
use std::path::PathBuf;

/// Terminal state of one location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationOutcome {
    /// Deployed, nothing to deploy, or synchronization declined
    Success,
    /// Full deploy declined
    Skipped,
    Failed,
}

impl fmt::Display for LocationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationOutcome::Success => f.write_str("success"),
            LocationOutcome::Skipped => f.write_str("skipped"),
            LocationOutcome::Failed => f.write_str("failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationReport {
    /// Base directory the location was resolved from
    pub base: PathBuf,
    pub name: String,
    pub outcome: LocationOutcome,
}

/// Result of a deploy run
#[derive(Debug, Clone, Default)]
pub struct DeployReport {
    pub locations: Vec<LocationReport>,
}

impl DeployReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, base: impl Into<PathBuf>, name: impl Into<String>, outcome: LocationOutcome) {
        self.locations.push(LocationReport {
            base: base.into(),
            name: name.into(),
            outcome,
        });
    }

    /// No location failed (skipped counts as success)
    pub fn is_success(&self) -> bool {
        self.locations
            .iter()
            .all(|l| l.outcome != LocationOutcome::Failed)
    }

    /// Outcome of the first location recorded under `name`
    pub fn outcome(&self, name: &str) -> Option<LocationOutcome> {
        self.locations
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.outcome)
    }

    pub fn failed_count(&self) -> usize {
        self.locations
            .iter()
            .filter(|l| l.outcome == LocationOutcome::Failed)
            .count()
    }
}
