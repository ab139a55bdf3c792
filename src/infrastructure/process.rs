//! External Process Helpers
//!
//! Thin wrappers around `std::process::Command` shared by the git source,
//! the SSH target and the rule pipeline.

use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tracing::trace;

/// Human-readable command line (for logs and errors)
pub fn describe(command: &Command) -> String {
    let mut parts = vec![command.get_program().to_string_lossy().into_owned()];
    parts.extend(command.get_args().map(|a| a.to_string_lossy().into_owned()));
    parts.join(" ")
}

/// Run to completion, capturing stdout and stderr
pub fn capture(command: &mut Command) -> io::Result<Output> {
    trace!("Running {}", describe(command));
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
}

/// Run to completion feeding `input` on stdin
pub fn filter(command: &mut Command, input: &[u8]) -> io::Result<Output> {
    trace!("Filtering through {}", describe(command));
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Feed stdin from a thread so a chatty child can't deadlock on a full pipe
    let stdin = child.stdin.take();
    let input = input.to_vec();
    let writer = std::thread::spawn(move || -> io::Result<()> {
        if let Some(mut stdin) = stdin {
            stdin.write_all(&input)?;
        }
        Ok(())
    });

    let output = child.wait_with_output()?;
    match writer.join() {
        Ok(Err(e)) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e),
        _ => {}
    }
    Ok(output)
}

/// Shell command executed with `sh -c` in `directory`
pub fn shell(script: &str, directory: &Path) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(script).current_dir(directory);
    command
}

/// Failure summary of a finished process: trimmed stderr, or the exit status
pub fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        match output.status.code() {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        }
    } else {
        stderr.to_string()
    }
}

/// Whether `program` can be spawned at all
pub fn is_available(program: impl AsRef<OsStr>) -> bool {
    Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Quote a single argument for a POSIX shell
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}
