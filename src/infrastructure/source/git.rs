//! Git Source
//!
//! Fingerprints are commit ids. Diffs come from `git diff --name-status`
//! and added content is exported with `git archive`.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::domain::entities::{Action, Fingerprint};
use crate::domain::ports::{Source, SourceError};
use crate::infrastructure::process;

pub struct GitSource;

impl GitSource {
    pub fn new() -> Self {
        Self
    }

    fn git(base: &Path, args: &[&str]) -> Command {
        let mut command = Command::new("git");
        command.args(args).current_dir(base);
        command
    }

    /// Run git and return trimmed stdout, or `None` on a non-zero exit
    fn query(base: &Path, args: &[&str]) -> Result<Option<String>, SourceError> {
        let mut command = Self::git(base, args);
        let output = process::capture(&mut command).map_err(|e| SourceError::Command {
            command: process::describe(&command),
            message: e.to_string(),
        })?;

        if output.status.success() {
            Ok(Some(String::from_utf8_lossy(&output.stdout).trim().to_string()))
        } else {
            debug!("{}: {}", process::describe(&command), process::failure_message(&output));
            Ok(None)
        }
    }

    fn resolve(base: &Path, revision: &str) -> Result<String, SourceError> {
        if revision.is_empty() {
            return Self::query(base, &["hash-object", "-t", "tree", "/dev/null"])?.ok_or_else(
                || SourceError::Command {
                    command: "git hash-object -t tree /dev/null".to_string(),
                    message: "can't compute empty tree".to_string(),
                },
            );
        }

        let spec = format!("{}^{{commit}}", revision);
        Self::query(base, &["rev-parse", "--quiet", "--verify", &spec])?
            .filter(|id| !id.is_empty())
            .ok_or_else(|| SourceError::UnknownRevision {
                revision: revision.to_string(),
            })
    }

    fn revision(fingerprint: &Fingerprint) -> Result<&str, SourceError> {
        match fingerprint {
            Fingerprint::Revision(rev) => Ok(rev),
            Fingerprint::Tree(_) => Err(SourceError::IncompatibleFingerprint {
                provider: "git",
                found: fingerprint.short(),
            }),
        }
    }

    /// `git archive <revision> . | tar x -C work`
    fn export(base: &Path, work: &Path, revision: &str) -> Result<(), SourceError> {
        let mut archive = Self::git(base, &["archive", "--format=tar", revision, "."]);
        let description = process::describe(&archive);
        let command_error = |message: String| SourceError::Command {
            command: description.clone(),
            message,
        };

        let mut archive = archive
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| command_error(e.to_string()))?;

        let stdout = archive
            .stdout
            .take()
            .ok_or_else(|| command_error("no archive output".to_string()))?;

        let extract = Command::new("tar")
            .arg("x")
            .arg("-C")
            .arg(work)
            .stdin(Stdio::from(stdout))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| SourceError::Command {
                command: "tar x".to_string(),
                message: e.to_string(),
            })?;

        let archived = archive
            .wait_with_output()
            .map_err(|e| command_error(e.to_string()))?;

        if !archived.status.success() {
            return Err(command_error(process::failure_message(&archived)));
        }
        if !extract.status.success() {
            return Err(SourceError::Command {
                command: "tar x".to_string(),
                message: process::failure_message(&extract),
            });
        }

        Ok(())
    }
}

impl Default for GitSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for GitSource {
    fn name(&self) -> &'static str {
        "git"
    }

    fn current(&self, base: &Path) -> Result<Fingerprint, SourceError> {
        Self::query(base, &["rev-parse", "--quiet", "--verify", "HEAD"])?
            .filter(|id| !id.is_empty())
            .map(Fingerprint::Revision)
            .ok_or_else(|| SourceError::NoCurrentRevision {
                path: base.to_path_buf(),
            })
    }

    fn diff(
        &self,
        base: &Path,
        work: &Path,
        from: Option<&Fingerprint>,
        to: &Fingerprint,
    ) -> Result<Vec<Action>, SourceError> {
        let from = match from {
            Some(fingerprint) => Self::revision(fingerprint)?,
            None => "",
        };
        let from = Self::resolve(base, from)?;
        let to = Self::resolve(base, Self::revision(to)?)?;

        if from == to {
            return Ok(Vec::new());
        }

        Self::export(base, work, &to)?;

        let mut command = Self::git(base, &["diff", "--name-status", "--relative", "-z", &from, &to]);
        let output = process::capture(&mut command).map_err(|e| SourceError::Command {
            command: process::describe(&command),
            message: e.to_string(),
        })?;
        if !output.status.success() {
            return Err(SourceError::Command {
                command: process::describe(&command),
                message: process::failure_message(&output),
            });
        }

        parse_name_status(&output.stdout)
    }
}

/// Parse `git diff --name-status -z` output into actions
pub fn parse_name_status(output: &[u8]) -> Result<Vec<Action>, SourceError> {
    let mut fields = output
        .split(|b| *b == 0)
        .map(|field| String::from_utf8_lossy(field).into_owned());
    let mut actions = Vec::new();

    let malformed = |status: &str| SourceError::Command {
        command: "git diff --name-status".to_string(),
        message: format!("unexpected status line '{}'", status),
    };

    while let Some(status) = fields.next() {
        if status.is_empty() {
            continue;
        }

        let mut path = || fields.next().filter(|p| !p.is_empty());

        match status.chars().next() {
            Some('A' | 'M' | 'T') => {
                actions.push(Action::add(path().ok_or_else(|| malformed(&status))?));
            }
            Some('D') => {
                actions.push(Action::del(path().ok_or_else(|| malformed(&status))?));
            }
            Some('R') => {
                let old = path().ok_or_else(|| malformed(&status))?;
                let new = path().ok_or_else(|| malformed(&status))?;
                actions.push(Action::del(old));
                actions.push(Action::add(new));
            }
            Some('C') => {
                let _copied_from = path().ok_or_else(|| malformed(&status))?;
                actions.push(Action::add(path().ok_or_else(|| malformed(&status))?));
            }
            _ => return Err(malformed(&status)),
        }
    }

    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::fs::local::write;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parse_name_status_maps_statuses() {
        let output = b"A\0new.txt\0M\0a/changed.txt\0T\0link\0D\0gone.txt\0R087\0old.txt\0moved/new.txt\0C100\0orig.txt\0copy.txt\0";
        let actions = parse_name_status(output).unwrap();
        assert_eq!(
            actions,
            vec![
                Action::add("new.txt"),
                Action::add("a/changed.txt"),
                Action::add("link"),
                Action::del("gone.txt"),
                Action::del("old.txt"),
                Action::add("moved/new.txt"),
                Action::add("copy.txt"),
            ]
        );
    }

    #[test]
    fn parse_name_status_keeps_spaces() {
        let actions = parse_name_status(b"A\0with space.txt\0").unwrap();
        assert_eq!(actions, vec![Action::add("with space.txt")]);
    }

    #[test]
    fn parse_name_status_empty() {
        assert!(parse_name_status(b"").unwrap().is_empty());
    }

    #[test]
    fn parse_name_status_rejects_unknown_status() {
        assert!(parse_name_status(b"X\0what\0").is_err());
        assert!(parse_name_status(b"R100\0only-one\0").is_err());
    }

    #[test]
    fn tree_fingerprint_is_incompatible() {
        let fp = Fingerprint::Tree(Default::default());
        assert!(matches!(
            GitSource::revision(&fp),
            Err(SourceError::IncompatibleFingerprint { provider: "git", .. })
        ));
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .unwrap();
        assert!(status.success(), "git {:?} failed", args);
    }

    fn init_repo(dir: &Path) {
        git(dir, &["init", "-q"]);
        git(dir, &["config", "user.email", "test@example.com"]);
        git(dir, &["config", "user.name", "Test"]);
        git(dir, &["config", "commit.gpgsign", "false"]);
    }

    fn commit_all(dir: &Path, message: &str) {
        git(dir, &["add", "-A"]);
        git(dir, &["commit", "-q", "-m", message]);
    }

    #[test]
    fn empty_repository_has_no_current_revision() {
        if !process::is_available("git") {
            return;
        }
        let repo = tempdir().unwrap();
        init_repo(repo.path());

        let err = GitSource::new().current(repo.path()).unwrap_err();
        assert!(matches!(err, SourceError::NoCurrentRevision { .. }));
    }

    #[test]
    fn first_deploy_exports_head() {
        if !process::is_available("git") {
            return;
        }
        let repo = tempdir().unwrap();
        let work = tempdir().unwrap();
        init_repo(repo.path());
        write(repo.path(), "a.txt", b"a").unwrap();
        write(repo.path(), "b/c.txt", b"c").unwrap();
        commit_all(repo.path(), "initial");

        let source = GitSource::new();
        let head = source.current(repo.path()).unwrap();
        let mut actions = source.diff(repo.path(), work.path(), None, &head).unwrap();
        actions.sort();

        assert_eq!(actions, vec![Action::add("a.txt"), Action::add("b/c.txt")]);
        assert_eq!(fs::read(work.path().join("b/c.txt")).unwrap(), b"c");
    }

    #[test]
    fn incremental_diff_between_commits() {
        if !process::is_available("git") {
            return;
        }
        let repo = tempdir().unwrap();
        let work = tempdir().unwrap();
        init_repo(repo.path());
        write(repo.path(), "keep.txt", b"k").unwrap();
        write(repo.path(), "notes.txt", b"n").unwrap();
        commit_all(repo.path(), "initial");

        let source = GitSource::new();
        let from = source.current(repo.path()).unwrap();

        fs::remove_file(repo.path().join("notes.txt")).unwrap();
        write(repo.path(), "keep.txt", b"changed").unwrap();
        commit_all(repo.path(), "second");
        let to = source.current(repo.path()).unwrap();

        let mut actions = source.diff(repo.path(), work.path(), Some(&from), &to).unwrap();
        actions.sort();
        assert_eq!(actions, vec![Action::del("notes.txt"), Action::add("keep.txt")]);

        let same = source.diff(repo.path(), work.path(), Some(&to), &to).unwrap();
        assert!(same.is_empty());
    }

    #[test]
    fn unknown_revision_is_an_error() {
        if !process::is_available("git") {
            return;
        }
        let repo = tempdir().unwrap();
        let work = tempdir().unwrap();
        init_repo(repo.path());
        write(repo.path(), "a.txt", b"a").unwrap();
        commit_all(repo.path(), "initial");

        let to = Fingerprint::Revision("no-such-branch".to_string());
        let err = GitSource::new()
            .diff(repo.path(), work.path(), None, &to)
            .unwrap_err();
        assert!(matches!(err, SourceError::UnknownRevision { .. }));
    }
}
