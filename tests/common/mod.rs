//! Shared helpers for CLI integration tests.

#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempDir;

/// Result of running the deltaship binary
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// A source tree and a local destination directory
pub struct TestSite {
    site: TempDir,
    dest: TempDir,
}

impl TestSite {
    /// Source tree with a `staging` location pointing at the destination
    pub fn new() -> Self {
        let site = Self {
            site: tempfile::tempdir().unwrap(),
            dest: tempfile::tempdir().unwrap(),
        };
        let environment = format!(
            "[staging]\nconnection = \"file://{}\"\n",
            site.dest.path().display()
        );
        site.write(".deltaship.env", &environment);
        site
    }

    pub fn base(&self) -> &Path {
        self.site.path()
    }

    pub fn dest(&self) -> &Path {
        self.dest.path()
    }

    pub fn write(&self, path: &str, content: &str) {
        let full = self.site.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    pub fn remove(&self, path: &str) {
        fs::remove_file(self.site.path().join(path)).unwrap();
    }

    pub fn dest_path(&self, path: &str) -> PathBuf {
        self.dest.path().join(path)
    }

    pub fn dest_file(&self, path: &str) -> Option<String> {
        fs::read_to_string(self.dest_path(path)).ok()
    }

    /// Run the binary in the site directory, feeding `stdin`
    pub fn run(&self, args: &[&str], stdin: &str) -> TestResult {
        let mut child = Command::new(env!("CARGO_BIN_EXE_deltaship"))
            .current_dir(self.site.path())
            .args(args)
            .env("DELTASHIP_SOURCE", "hash")
            .env_remove("RUST_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();

        child
            .stdin
            .take()
            .unwrap()
            .write_all(stdin.as_bytes())
            .unwrap();

        let output = child.wait_with_output().unwrap();
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}
