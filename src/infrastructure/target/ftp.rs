//! FTP Target
//!
//! One control connection per `read`/`send`, closed by `FtpSession::drop`.
//! A 550 reply means "already exists" for MKD and "not found" for DELE/RETR.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpResult, FtpStream, Mode, Status};
use tracing::{debug, trace};

use crate::domain::entities::{Action, ActionKind};
use crate::domain::ports::{ancestors, group_by_parent, Target, TargetError};
use crate::infrastructure::fs::local;

pub const DEFAULT_PORT: u16 = 21;

pub struct FtpTarget {
    host: String,
    port: u16,
    user: Option<String>,
    password: Option<String>,
    directory: String,
    passive: bool,
}

/// Logged-in control connection, quit on drop
struct FtpSession {
    stream: FtpStream,
}

impl Drop for FtpSession {
    fn drop(&mut self) {
        if let Err(e) = self.stream.quit() {
            trace!("FTP quit failed: {}", e);
        }
    }
}

/// Commands `send` issues on a logged-in connection
trait FtpCommands {
    fn mkdir(&mut self, path: &str) -> FtpResult<()>;
    fn rm(&mut self, path: &str) -> FtpResult<()>;
    fn rmdir(&mut self, path: &str) -> FtpResult<()>;
    fn put(&mut self, path: &str, content: &mut File) -> FtpResult<u64>;
}

impl FtpCommands for FtpStream {
    fn mkdir(&mut self, path: &str) -> FtpResult<()> {
        FtpStream::mkdir(self, path)
    }

    fn rm(&mut self, path: &str) -> FtpResult<()> {
        FtpStream::rm(self, path)
    }

    fn rmdir(&mut self, path: &str) -> FtpResult<()> {
        FtpStream::rmdir(self, path)
    }

    fn put(&mut self, path: &str, content: &mut File) -> FtpResult<u64> {
        self.put_file(path, content)
    }
}

fn is_unavailable(error: &FtpError) -> bool {
    match error {
        FtpError::UnexpectedResponse(response) => {
            matches!(response.status, Status::FileUnavailable)
        }
        _ => false,
    }
}

impl FtpTarget {
    pub fn new(
        host: impl Into<String>,
        port: Option<u16>,
        user: Option<String>,
        password: Option<String>,
        directory: impl Into<String>,
        passive: bool,
    ) -> Self {
        Self {
            host: host.into(),
            port: port.unwrap_or(DEFAULT_PORT),
            user,
            password,
            directory: directory.into(),
            passive,
        }
    }

    fn no_connection(&self, error: impl ToString) -> TargetError {
        TargetError::NoConnection {
            target: self.display_name(),
            message: error.to_string(),
        }
    }

    fn transfer_error(path: &str, error: FtpError) -> TargetError {
        TargetError::Transfer {
            path: path.to_string(),
            message: error.to_string(),
        }
    }

    fn connect(&self) -> Result<FtpSession, TargetError> {
        debug!("Connecting to {}", self.display_name());

        let stream = FtpStream::connect((self.host.as_str(), self.port))
            .map_err(|e| self.no_connection(e))?;
        let mut session = FtpSession { stream };

        let user = self.user.as_deref().unwrap_or("anonymous");
        let password = self.password.as_deref().unwrap_or("");
        session
            .stream
            .login(user, password)
            .map_err(|e| self.no_connection(e))?;

        session.stream.set_mode(if self.passive {
            Mode::Passive
        } else {
            Mode::Active
        });
        session
            .stream
            .transfer_type(FileType::Binary)
            .map_err(|e| self.no_connection(e))?;

        if !self.directory.is_empty() {
            session
                .stream
                .cwd(&self.directory)
                .map_err(|e| self.no_connection(e))?;
        }

        Ok(session)
    }

    fn make_directories<C: FtpCommands>(
        commands: &mut C,
        directory: &str,
        created: &mut HashSet<String>,
    ) -> Result<(), TargetError> {
        for parent in ancestors(directory) {
            if created.contains(&parent) {
                continue;
            }
            match commands.mkdir(&parent) {
                Ok(()) => {}
                Err(e) if is_unavailable(&e) => {}
                Err(e) => return Err(Self::transfer_error(&parent, e)),
            }
            created.insert(parent);
        }
        Ok(())
    }

    fn prune_parents<C: FtpCommands>(commands: &mut C, path: &str) {
        let mut current = path;
        while let Some((parent, _)) = current.rsplit_once('/') {
            if commands.rmdir(parent).is_err() {
                break;
            }
            current = parent;
        }
    }

    /// Replay actions over a logged-in connection
    fn replay<C: FtpCommands>(
        &self,
        commands: &mut C,
        work: &Path,
        actions: &[Action],
    ) -> Result<(), TargetError> {
        let mut created = HashSet::new();

        for (parent, group) in group_by_parent(actions) {
            for action in group {
                debug!("{} {}", self.display_name(), action);
                match action.kind() {
                    ActionKind::Add => {
                        Self::make_directories(commands, parent, &mut created)?;
                        let staged = local::resolve(work, action.path());
                        let mut file = File::open(&staged)
                            .map_err(|source| TargetError::Staging { path: staged, source })?;
                        commands
                            .put(action.path(), &mut file)
                            .map_err(|e| Self::transfer_error(action.path(), e))?;
                    }
                    ActionKind::Del => {
                        match commands.rm(action.path()) {
                            Ok(()) => {}
                            Err(e) if is_unavailable(&e) => {}
                            Err(e) => return Err(Self::transfer_error(action.path(), e)),
                        }
                        Self::prune_parents(commands, action.path());
                        // Pruned directories may be needed again
                        created.clear();
                    }
                }
            }
        }

        Ok(())
    }
}

impl Target for FtpTarget {
    fn display_name(&self) -> String {
        let user = self
            .user
            .as_deref()
            .map(|u| format!("{}@", u))
            .unwrap_or_default();
        format!("ftp://{}{}:{}/{}", user, self.host, self.port, self.directory)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, TargetError> {
        let mut session = self.connect()?;
        match session.stream.retr_as_buffer(path) {
            Ok(cursor) => Ok(cursor.into_inner()),
            Err(e) if is_unavailable(&e) => Ok(Vec::new()),
            Err(e) => Err(Self::transfer_error(path, e)),
        }
    }

    fn send(&self, work: &Path, actions: &[Action]) -> Result<(), TargetError> {
        let mut session = self.connect()?;
        self.replay(&mut session.stream, work, actions)
    }
}
