//! SCM (Source Control Management) abstraction layer.
//!
//! The pipeline talks to version control only through [`Scm`], so each step
//! can be exercised against a recording double in tests and against the real
//! `git` binary through [`GitScm`].

mod git;

use std::path::Path;

use crate::error::StepError;

pub use git::GitScm;

/// Directory whose presence marks a repository root
pub const MARKER: &str = ".git";

/// Trait for source control management operations.
pub trait Scm: Send + Sync {
    /// Get the working directory root.
    fn workdir(&self) -> &Path;

    /// Stage all changes in the working directory.
    fn stage_all(&self) -> Result<(), StepError>;

    /// Check if the index differs from HEAD.
    fn has_staged_changes(&self) -> Result<bool, StepError>;

    /// Commit staged changes with a message.
    fn commit(&self, message: &str) -> Result<(), StepError>;

    /// List local branches matching `name`.
    fn list_branches(&self, name: &str) -> Result<Vec<String>, StepError>;

    /// Create a branch at HEAD without switching to it.
    fn create_branch(&self, name: &str) -> Result<(), StepError>;

    /// Switch the working directory to a branch.
    fn checkout(&self, name: &str) -> Result<(), StepError>;

    /// List all remote names.
    fn list_remotes(&self) -> Result<Vec<String>, StepError>;

    /// Add a remote repository.
    fn add_remote(&self, name: &str, url: &str) -> Result<(), StepError>;

    /// Set a key in the repository-local config.
    fn set_config(&self, key: &str, value: &str) -> Result<(), StepError>;

    /// Push a branch to a remote repository.
    fn push(&self, remote: &str, branch: &str) -> Result<(), StepError>;
}

/// Check if a directory is a Git repository root.
pub fn is_repo(path: &Path) -> bool {
    path.join(MARKER).is_dir()
}

/// Parse `git branch --list` output into bare branch names.
///
/// Each line carries a two-column marker: `* ` for the current branch, `+ `
/// for a branch checked out in another worktree, blanks otherwise.
pub fn parse_branch_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| line.get(2..).unwrap_or_default().trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `git remote` output into remote names.
pub fn parse_remote_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
