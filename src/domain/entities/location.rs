//! Location entity - one named deployment destination
//!
//! Locations are read-only once loaded from the environment file.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Default state file path, relative to the destination (or base in local mode)
pub const DEFAULT_STATE_PATH: &str = ".deltaship.rev";

/// Transport-specific options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationOptions {
    /// FTP passive mode
    pub passive: bool,
    /// SSH private key file
    pub identity: Option<PathBuf>,
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self {
            passive: true,
            identity: None,
        }
    }
}

/// A deployment destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub name: String,
    /// `scheme://...` connection string; `None` means no deployment at this level
    pub connection: Option<String>,
    pub options: LocationOptions,
    /// Store the revision record on local disk instead of the destination
    pub local: bool,
    /// State file path
    pub state: String,
    /// Paths or globs always deployed
    pub append_files: Vec<String>,
    /// Paths or globs always deleted
    pub remove_files: Vec<String>,
    /// Nested environments: sub-path → location names
    pub subsidiaries: BTreeMap<String, Vec<String>>,
}

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            connection: None,
            options: LocationOptions::default(),
            local: false,
            state: DEFAULT_STATE_PATH.to_string(),
            append_files: Vec::new(),
            remove_files: Vec::new(),
            subsidiaries: BTreeMap::new(),
        }
    }

    /// Nothing to deploy and nothing to recurse into
    pub fn is_inert(&self) -> bool {
        self.connection.is_none() && self.subsidiaries.is_empty()
    }
}

/// Location registry loaded from one environment file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    locations: BTreeMap<String, Location>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: Location) {
        self.locations.insert(location.name.clone(), location);
    }

    pub fn get(&self, name: &str) -> Option<&Location> {
        self.locations.get(name)
    }

    /// All declared names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.locations.keys().map(|s| s.as_str())
    }

    /// Expand requested names: none ⇒ `default`, a lone `*` ⇒ every location
    pub fn expand_names(&self, requested: &[String]) -> Vec<String> {
        match requested {
            [] => vec!["default".to_string()],
            [only] if only == "*" => self.names().map(str::to_string).collect(),
            names => names.to_vec(),
        }
    }
}
