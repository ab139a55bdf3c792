//! SSH Target
//!
//! Drives the system `ssh` and `scp` binaries in batch mode; authentication
//! comes from the agent or an identity file. Exit status 255 means the
//! connection itself failed.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::debug;

use crate::domain::entities::{Action, ActionKind};
use crate::domain::ports::{ancestors, group_by_parent, Target, TargetError};
use crate::infrastructure::fs::local;
use crate::infrastructure::process::{self, shell_quote};

/// Exit status reserved by ssh and scp for connection errors
const CONNECTION_FAILURE: i32 = 255;

/// Program plus leading arguments used to start a client
#[derive(Debug, Clone)]
struct Launcher {
    program: OsString,
    args: Vec<OsString>,
}

impl Launcher {
    fn new(program: &str) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

pub struct SshTarget {
    host: String,
    port: Option<u16>,
    user: Option<String>,
    directory: String,
    identity: Option<PathBuf>,
    ssh: Launcher,
    scp: Launcher,
}

impl SshTarget {
    pub fn new(
        host: impl Into<String>,
        port: Option<u16>,
        user: Option<String>,
        directory: impl Into<String>,
        identity: Option<PathBuf>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            user,
            directory: directory.into(),
            identity,
            ssh: Launcher::new("ssh"),
            scp: Launcher::new("scp"),
        }
    }

    fn destination(&self) -> String {
        match &self.user {
            Some(user) => format!("{}@{}", user, self.host),
            None => self.host.clone(),
        }
    }

    /// Destination path of a relative action path
    fn remote_path(&self, relative: &str) -> String {
        let root = self.directory.trim_end_matches('/');
        match (self.directory.is_empty(), relative.is_empty()) {
            (true, true) => ".".to_string(),
            (true, false) => relative.to_string(),
            (false, true) if root.is_empty() => "/".to_string(),
            (false, true) => root.to_string(),
            (false, false) => format!("{}/{}", root, relative),
        }
    }

    fn ssh(&self, script: &str) -> Command {
        let mut command = self.ssh.command();
        command.args(["-o", "BatchMode=yes"]);
        if let Some(port) = self.port {
            command.arg("-p").arg(port.to_string());
        }
        if let Some(identity) = &self.identity {
            command.arg("-i").arg(identity);
        }
        command.arg(self.destination()).arg(script);
        command
    }

    fn scp(&self, files: &[PathBuf], remote_directory: &str) -> Command {
        let mut command = self.scp.command();
        command.args(["-q", "-o", "BatchMode=yes"]);
        if let Some(port) = self.port {
            command.arg("-P").arg(port.to_string());
        }
        if let Some(identity) = &self.identity {
            command.arg("-i").arg(identity);
        }
        command.args(files);
        command.arg(format!("{}:{}/", self.destination(), remote_directory));
        command
    }

    /// Run a command, mapping exit 255 to `NoConnection`
    fn run(&self, mut command: Command, path: &str) -> Result<Output, TargetError> {
        let output = process::capture(&mut command).map_err(|e| TargetError::NoConnection {
            target: self.display_name(),
            message: format!("{}: {}", process::describe(&command), e),
        })?;

        match output.status.code() {
            Some(0) => Ok(output),
            Some(CONNECTION_FAILURE) => Err(TargetError::NoConnection {
                target: self.display_name(),
                message: process::failure_message(&output),
            }),
            _ => Err(TargetError::Transfer {
                path: path.to_string(),
                message: process::failure_message(&output),
            }),
        }
    }

    fn read_script(&self, path: &str) -> String {
        let remote = shell_quote(&self.remote_path(path));
        format!("if [ -f {0} ]; then cat {0}; fi", remote)
    }

    fn delete_script(&self, parent: &str, paths: &[&str]) -> String {
        let targets: Vec<String> = paths
            .iter()
            .map(|p| shell_quote(&self.remote_path(p)))
            .collect();
        let mut script = format!("rm -f -- {}", targets.join(" "));

        // Best-effort pruning, deepest first, never above the destination root
        let prune: Vec<String> = ancestors(parent)
            .iter()
            .rev()
            .map(|dir| format!("rmdir {}", shell_quote(&self.remote_path(dir))))
            .collect();
        if !prune.is_empty() {
            script.push_str(&format!(" && {{ ({}) 2>/dev/null; true; }}", prune.join(" && ")));
        }
        script
    }
}

impl Target for SshTarget {
    fn display_name(&self) -> String {
        let port = self.port.map(|p| format!(":{}", p)).unwrap_or_default();
        format!("ssh://{}{}/{}", self.destination(), port, self.directory)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, TargetError> {
        let output = self.run(self.ssh(&self.read_script(path)), path)?;
        Ok(output.stdout)
    }

    fn send(&self, work: &Path, actions: &[Action]) -> Result<(), TargetError> {
        for (parent, group) in group_by_parent(actions) {
            let (adds, dels): (Vec<&Action>, Vec<&Action>) =
                group.into_iter().partition(|a| a.kind() == ActionKind::Add);

            if !dels.is_empty() {
                let paths: Vec<&str> = dels.iter().map(|a| a.path()).collect();
                debug!("{} removing {}", self.display_name(), paths.join(", "));
                self.run(self.ssh(&self.delete_script(parent, &paths)), parent)?;
            }

            if !adds.is_empty() {
                let remote_directory = self.remote_path(parent);
                let mkdir = format!("mkdir -p {}", shell_quote(&remote_directory));
                self.run(self.ssh(&mkdir), parent)?;

                let mut files = Vec::with_capacity(adds.len());
                for action in &adds {
                    let staged = local::resolve(work, action.path());
                    if !staged.is_file() {
                        return Err(TargetError::Staging {
                            path: staged,
                            source: std::io::Error::from(std::io::ErrorKind::NotFound),
                        });
                    }
                    files.push(staged);
                }

                debug!("{} uploading {} file(s) to '{}'", self.display_name(), files.len(), remote_directory);
                self.run(self.scp(&files, &remote_directory), parent)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::fs::local::write;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn target() -> SshTarget {
        SshTarget::new(
            "example.com",
            Some(2222),
            Some("deploy".to_string()),
            "/var/www",
            Some(PathBuf::from("/keys/id_ed25519")),
        )
    }

    #[test]
    fn display_name_includes_user_and_port() {
        assert_eq!(target().display_name(), "ssh://deploy@example.com:2222//var/www");
    }

    #[test]
    fn remote_path_joins_directory() {
        assert_eq!(target().remote_path("a/b.txt"), "/var/www/a/b.txt");
        assert_eq!(target().remote_path(""), "/var/www");

        let home = SshTarget::new("host", None, None, "", None);
        assert_eq!(home.remote_path("a.txt"), "a.txt");
        assert_eq!(home.remote_path(""), ".");
    }

    #[test]
    fn ssh_command_uses_batch_mode_port_and_identity() {
        let command = target().ssh("true");
        assert_eq!(
            process::describe(&command),
            "ssh -o BatchMode=yes -p 2222 -i /keys/id_ed25519 deploy@example.com true"
        );
    }

    #[test]
    fn scp_command_targets_directory() {
        let command = target().scp(&[PathBuf::from("/tmp/w/a.txt")], "/var/www/b");
        assert_eq!(
            process::describe(&command),
            "scp -q -o BatchMode=yes -P 2222 -i /keys/id_ed25519 /tmp/w/a.txt deploy@example.com:/var/www/b/"
        );
    }

    #[test]
    fn read_script_tolerates_missing_file() {
        assert_eq!(
            target().read_script(".deltaship.rev"),
            "if [ -f '/var/www/.deltaship.rev' ]; then cat '/var/www/.deltaship.rev'; fi"
        );
    }

    #[test]
    fn delete_script_prunes_deepest_first() {
        let script = target().delete_script("a/b", &["a/b/x.txt"]);
        assert_eq!(
            script,
            "rm -f -- '/var/www/a/b/x.txt' && { (rmdir '/var/www/a/b' && rmdir '/var/www/a') 2>/dev/null; true; }"
        );
    }

    #[test]
    fn delete_script_at_root_has_no_prune() {
        assert_eq!(
            target().delete_script("", &["a.txt", "it's.txt"]),
            "rm -f -- '/var/www/a.txt' '/var/www/it'\\''s.txt'"
        );
    }

    /// `sh` scripts standing in for `ssh` and `scp`, logging their arguments
    #[cfg(unix)]
    struct StubClients {
        dir: TempDir,
    }

    #[cfg(unix)]
    impl StubClients {
        fn new(ssh_body: &str, scp_body: &str) -> Self {
            let stubs = Self { dir: tempdir().unwrap() };
            stubs.script("ssh", ssh_body);
            stubs.script("scp", scp_body);
            stubs
        }

        /// Stub logging its arguments, then exiting with `code`
        fn logging(name: &str, code: i32) -> String {
            format!("printf '%s\\n' \"$*\" >> \"$(dirname \"$0\")/{}.log\"\nexit {}\n", name, code)
        }

        fn script(&self, name: &str, body: &str) {
            fs::write(self.dir.path().join(name), body).unwrap();
        }

        fn launcher(&self, name: &str) -> Launcher {
            Launcher {
                program: "sh".into(),
                args: vec![self.dir.path().join(name).into_os_string()],
            }
        }

        fn attach(&self, mut target: SshTarget) -> SshTarget {
            target.ssh = self.launcher("ssh");
            target.scp = self.launcher("scp");
            target
        }

        fn log(&self, name: &str) -> Vec<String> {
            fs::read_to_string(self.dir.path().join(format!("{}.log", name)))
                .unwrap_or_default()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    #[cfg(unix)]
    fn stubbed(stubs: &StubClients) -> SshTarget {
        stubs.attach(SshTarget::new("host", None, Some("deploy".to_string()), "/srv", None))
    }

    #[cfg(unix)]
    #[test]
    fn read_returns_remote_output() {
        let stubs = StubClients::new("printf 'rev-blob'\n", "exit 0\n");
        assert_eq!(stubbed(&stubs).read(".deltaship.rev").unwrap(), b"rev-blob");
    }

    #[cfg(unix)]
    #[test]
    fn exit_255_is_no_connection() {
        let stubs = StubClients::new(
            &StubClients::logging("ssh", 255),
            &StubClients::logging("scp", 0),
        );

        let err = stubbed(&stubs).read(".deltaship.rev").unwrap_err();
        assert!(matches!(err, TargetError::NoConnection { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn other_failures_are_transfer_errors() {
        let stubs = StubClients::new(
            &StubClients::logging("ssh", 0),
            &StubClients::logging("scp", 1),
        );
        let work = tempdir().unwrap();
        write(work.path(), "a.txt", b"a").unwrap();

        let err = stubbed(&stubs)
            .send(work.path(), &[Action::add("a.txt")])
            .unwrap_err();
        assert!(matches!(err, TargetError::Transfer { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn send_batches_commands_per_parent_group() {
        let stubs = StubClients::new(
            &StubClients::logging("ssh", 0),
            &StubClients::logging("scp", 0),
        );
        let work = tempdir().unwrap();
        write(work.path(), "a/z.txt", b"z").unwrap();
        write(work.path(), "b/w.txt", b"w").unwrap();

        stubbed(&stubs)
            .send(
                work.path(),
                &[
                    Action::del("a/x.txt"),
                    Action::del("a/y.txt"),
                    Action::add("a/z.txt"),
                    Action::add("b/w.txt"),
                ],
            )
            .unwrap();

        let ssh = stubs.log("ssh");
        assert_eq!(ssh.len(), 3);
        assert!(ssh[0].contains("rm -f -- '/srv/a/x.txt' '/srv/a/y.txt'"));
        assert!(ssh[1].ends_with("mkdir -p '/srv/a'"));
        assert!(ssh[2].ends_with("mkdir -p '/srv/b'"));

        let scp = stubs.log("scp");
        assert_eq!(scp.len(), 2);
        assert!(scp[0].contains("z.txt") && scp[0].ends_with("deploy@host:/srv/a/"));
        assert!(scp[1].contains("w.txt") && scp[1].ends_with("deploy@host:/srv/b/"));
    }
}
