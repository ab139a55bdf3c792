//! Target Providers
//!
//! - `file` - Local directory
//! - `ftp` - FTP server
//! - `ssh` - SSH host through `ssh`/`scp`

mod file;
mod ftp;
mod ssh;

pub use file::FileTarget;
pub use ftp::FtpTarget;
pub use ssh::SshTarget;

use std::path::Path;

use tracing::warn;

use crate::domain::entities::LocationOptions;
use crate::domain::ports::Target;
use crate::domain::value_objects::{Connection, ConnectionScheme};
use crate::error::ConfigError;

/// Build the target for a connection string
///
/// Relative `file://` directories are resolved against `base`.
pub fn create_target(
    connection: &str,
    options: &LocationOptions,
    base: &Path,
) -> Result<Box<dyn Target>, ConfigError> {
    let parsed = Connection::parse(connection)?;

    for warning in parsed.warnings() {
        warn!("{}", warning);
    }

    let host = || {
        parsed
            .host
            .clone()
            .ok_or_else(|| ConfigError::MalformedConnection {
                connection: connection.to_string(),
            })
    };

    let target: Box<dyn Target> = match parsed.scheme {
        ConnectionScheme::File => Box::new(FileTarget::new(base.join(&parsed.directory))),
        ConnectionScheme::Ftp => Box::new(FtpTarget::new(
            host()?,
            parsed.port,
            parsed.user.clone(),
            parsed.password.clone(),
            parsed.directory.clone(),
            options.passive,
        )),
        ConnectionScheme::Ssh => Box::new(SshTarget::new(
            host()?,
            parsed.port,
            parsed.user.clone(),
            parsed.directory.clone(),
            options.identity.clone(),
        )),
    };

    Ok(target)
}
