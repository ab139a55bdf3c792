//! Source Type Value Object

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Closed set of source providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    /// Content-hash tree walker
    Hash,
    /// Git history
    Git,
}

impl FromStr for SourceType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hash" | "delta" => Ok(SourceType::Hash),
            "git" => Ok(SourceType::Git),
            _ => Err(ConfigError::UnknownSource {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::Hash => f.write_str("hash"),
            SourceType::Git => f.write_str("git"),
        }
    }
}
