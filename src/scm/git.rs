//! Git SCM backend using CLI commands.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use super::{parse_branch_list, parse_remote_list, Scm};
use crate::error::StepError;

/// Git SCM implementation using the git CLI.
pub struct GitScm {
    workdir: PathBuf,
}

impl GitScm {
    /// Bind to a working directory without checking it.
    pub fn new(path: &Path) -> Self {
        Self {
            workdir: path.to_path_buf(),
        }
    }

    /// Initialize a repository at `path` with `git init <path>`.
    pub fn init(path: &Path) -> Result<Self, StepError> {
        let output = Command::new("git")
            .arg("init")
            .arg(path)
            .output()
            .map_err(|source| StepError::Spawn {
                command: format!("init {}", path.display()),
                source,
            })?;

        if !output.status.success() {
            return Err(StepError::InitFailed {
                path: path.display().to_string(),
                stderr: stderr_of(&output),
            });
        }

        log::debug!("Initialized git repository at {}", path.display());
        Ok(Self::new(path))
    }

    /// Check whether a `git` executable can be run at all.
    pub fn is_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn output(&self, args: &[&str]) -> Result<Output, StepError> {
        log::debug!("Running: git {}", args.join(" "));
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|source| StepError::Spawn {
                command: args.join(" "),
                source,
            })
    }

    /// Run a git command and return stdout, mapping a non-zero exit through `on_fail`.
    fn run_git<F>(&self, args: &[&str], on_fail: F) -> Result<String, StepError>
    where
        F: FnOnce(String) -> StepError,
    {
        let output = self.output(args)?;

        if !output.status.success() {
            return Err(on_fail(stderr_of(&output)));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

impl Scm for GitScm {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn stage_all(&self) -> Result<(), StepError> {
        self.run_git(&["add", "."], StepError::StageFailed)?;
        Ok(())
    }

    fn has_staged_changes(&self) -> Result<bool, StepError> {
        // Exit 1 means "differences found", anything else non-zero is a real error.
        let output = self.output(&["diff", "--cached", "--quiet"])?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(StepError::CommitFailed(stderr_of(&output))),
        }
    }

    fn commit(&self, message: &str) -> Result<(), StepError> {
        let output = self.output(&["commit", "--allow-empty-message", "-m", message])?;

        if !output.status.success() {
            // "nothing to commit" is reported on stdout, not stderr
            let mut detail = stderr_of(&output);
            if detail.is_empty() {
                detail = String::from_utf8_lossy(&output.stdout).trim().to_string();
            }
            return Err(StepError::CommitFailed(detail));
        }

        print!("{}", String::from_utf8_lossy(&output.stdout));
        Ok(())
    }

    fn list_branches(&self, name: &str) -> Result<Vec<String>, StepError> {
        let stdout = self.run_git(&["branch", "--list", name], |stderr| {
            StepError::BranchFailed {
                branch: name.to_string(),
                stderr,
            }
        })?;
        Ok(parse_branch_list(&stdout))
    }

    fn create_branch(&self, name: &str) -> Result<(), StepError> {
        self.run_git(&["branch", name], |stderr| StepError::BranchFailed {
            branch: name.to_string(),
            stderr,
        })?;
        Ok(())
    }

    fn checkout(&self, name: &str) -> Result<(), StepError> {
        self.run_git(&["checkout", name], |stderr| StepError::CheckoutFailed {
            branch: name.to_string(),
            stderr,
        })?;
        Ok(())
    }

    fn list_remotes(&self) -> Result<Vec<String>, StepError> {
        let stdout = self.run_git(&["remote"], |stderr| StepError::RemoteFailed {
            remote: String::new(),
            stderr,
        })?;
        Ok(parse_remote_list(&stdout))
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<(), StepError> {
        self.run_git(&["remote", "add", name, url], |stderr| {
            StepError::RemoteFailed {
                remote: name.to_string(),
                stderr,
            }
        })?;
        Ok(())
    }

    fn set_config(&self, key: &str, value: &str) -> Result<(), StepError> {
        self.run_git(&["config", key, value], |stderr| StepError::ConfigFailed {
            key: key.to_string(),
            stderr,
        })?;
        Ok(())
    }

    fn push(&self, remote: &str, branch: &str) -> Result<(), StepError> {
        log::debug!("Running: git push {} {}", remote, branch);

        // Inherit stdio so git's progress and credential prompts reach the operator.
        let status = Command::new("git")
            .args(["push", remote, branch])
            .current_dir(&self.workdir)
            .status()
            .map_err(|source| StepError::Spawn {
                command: format!("push {remote} {branch}"),
                source,
            })?;

        if !status.success() {
            return Err(StepError::PushFailed {
                remote: remote.to_string(),
                branch: branch.to_string(),
                code: status.code(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn init_repo(temp: &TempDir) -> GitScm {
        let scm = GitScm::init(temp.path()).unwrap();
        scm.set_config("user.name", "Test User").unwrap();
        scm.set_config("user.email", "test@example.com").unwrap();
        scm
    }

    #[test]
    fn test_git_init_creates_marker() {
        if !GitScm::is_available() {
            eprintln!("Skipping: git not installed");
            return;
        }

        let temp = TempDir::new().unwrap();
        let scm = GitScm::init(temp.path()).unwrap();

        assert!(temp.path().join(".git").is_dir());
        assert_eq!(scm.workdir(), temp.path());
    }

    #[test]
    fn test_git_stage_commit() {
        if !GitScm::is_available() {
            eprintln!("Skipping: git not installed");
            return;
        }

        let temp = TempDir::new().unwrap();
        let scm = init_repo(&temp);

        fs::write(temp.path().join("test.txt"), "hello").unwrap();
        assert!(!scm.has_staged_changes().unwrap());

        scm.stage_all().unwrap();
        assert!(scm.has_staged_changes().unwrap());

        scm.commit("Initial commit").unwrap();
        assert!(!scm.has_staged_changes().unwrap());
    }

    #[test]
    fn test_empty_message_is_committed() {
        if !GitScm::is_available() {
            eprintln!("Skipping: git not installed");
            return;
        }

        let temp = TempDir::new().unwrap();
        let scm = init_repo(&temp);

        fs::write(temp.path().join("test.txt"), "hello").unwrap();
        scm.stage_all().unwrap();
        scm.commit("").unwrap();
        assert!(!scm.has_staged_changes().unwrap());
    }

    #[test]
    fn test_commit_with_nothing_staged_fails() {
        if !GitScm::is_available() {
            eprintln!("Skipping: git not installed");
            return;
        }

        let temp = TempDir::new().unwrap();
        let scm = init_repo(&temp);

        let err = scm.commit("empty").unwrap_err();
        assert!(matches!(err, StepError::CommitFailed(_)));
    }

    #[test]
    fn test_git_branch_create_and_checkout() {
        if !GitScm::is_available() {
            eprintln!("Skipping: git not installed");
            return;
        }

        let temp = TempDir::new().unwrap();
        let scm = init_repo(&temp);

        fs::write(temp.path().join("test.txt"), "hello").unwrap();
        scm.stage_all().unwrap();
        scm.commit("Initial commit").unwrap();

        assert!(scm.list_branches("feature").unwrap().is_empty());
        scm.create_branch("feature").unwrap();
        assert_eq!(scm.list_branches("feature").unwrap(), vec!["feature"]);

        scm.checkout("feature").unwrap();
        let current = scm.list_branches("feature").unwrap();
        assert_eq!(current, vec!["feature"]);
    }

    #[test]
    fn test_checkout_unknown_branch_fails() {
        if !GitScm::is_available() {
            eprintln!("Skipping: git not installed");
            return;
        }

        let temp = TempDir::new().unwrap();
        let scm = init_repo(&temp);

        let err = scm.checkout("does-not-exist").unwrap_err();
        assert!(matches!(err, StepError::CheckoutFailed { .. }));
    }

    #[test]
    fn test_git_remote() {
        if !GitScm::is_available() {
            eprintln!("Skipping: git not installed");
            return;
        }

        let temp = TempDir::new().unwrap();
        let scm = init_repo(&temp);

        assert!(scm.list_remotes().unwrap().is_empty());

        scm.add_remote("origin", "https://github.com/test/repo.git")
            .unwrap();
        assert_eq!(scm.list_remotes().unwrap(), vec!["origin"]);

        let err = scm
            .add_remote("origin", "https://github.com/test/other.git")
            .unwrap_err();
        assert!(matches!(err, StepError::RemoteFailed { .. }));
    }

    #[test]
    fn test_push_to_missing_remote_fails() {
        if !GitScm::is_available() {
            eprintln!("Skipping: git not installed");
            return;
        }

        let temp = TempDir::new().unwrap();
        let scm = init_repo(&temp);

        let err = scm.push("nowhere", "main").unwrap_err();
        assert!(matches!(err, StepError::PushFailed { .. }));
    }
}
