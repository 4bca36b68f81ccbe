//! Staged-change gate for pre-commit use
//!
//! This module provides:
//! - The `ChangeGate` trait the binary consults before checking
//! - A git-backed implementation that inspects the index

use std::path::Path;
use std::process::{Command, Output};
use tracing::debug;

/// Decides whether the manifest is part of the pending change
pub trait ChangeGate {
    /// Returns true if the manifest at `path` should be checked
    fn is_staged(&self, path: &Path) -> bool;
}

/// Gate that asks git whether the manifest is staged
#[derive(Debug, Default)]
pub struct GitChangeGate;

impl GitChangeGate {
    /// Create a new git gate
    pub fn new() -> Self {
        Self
    }

    /// Run `git diff --name-only --cached` for a single file
    fn staged_names(&self, path: &Path) -> std::io::Result<Output> {
        let (dir, file) = split_path(path);
        let mut cmd = Command::new("git");
        cmd.args(["diff", "--name-only", "--cached", "--"]).arg(file);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }
        cmd.output()
    }
}

impl ChangeGate for GitChangeGate {
    fn is_staged(&self, path: &Path) -> bool {
        match self.staged_names(path) {
            Ok(output) if output.status.success() => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                is_listed(&stdout)
            }
            Ok(output) => {
                debug!(
                    status = %output.status,
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "git diff failed, treating manifest as unstaged"
                );
                false
            }
            Err(e) => {
                debug!("could not run git: {}", e);
                false
            }
        }
    }
}

/// Split a manifest path into the directory to run git in and the file name
fn split_path(path: &Path) -> (Option<&Path>, &Path) {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            (Some(parent), Path::new(name))
        }
        _ => (None, path),
    }
}

/// Returns true if git listed at least one path
fn is_listed(stdout: &str) -> bool {
    stdout.lines().any(|line| !line.trim().is_empty())
}
