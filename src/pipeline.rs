use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::credentials::Credentials;
use crate::error::StepError;
use crate::logger::log_to_file;
use crate::scm::{self, GitScm, Scm};
use crate::selector::{Choice, SEPARATOR};

/// Whether the initializer had to create the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Initialized,
    AlreadyInitialized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    NothingToCommit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchOutcome {
    Created,
    Existing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOutcome {
    Added,
    AlreadyExists,
}

/// Everything the executor needs for one run
#[derive(Debug, Clone)]
pub struct PushPlan {
    pub message: String,
    pub branch: String,
    pub credentials: Credentials,
}

/// What each step ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub commit: CommitOutcome,
    pub branch: BranchOutcome,
    pub remote: RemoteOutcome,
}

/// Resolve the repository root: an explicit directory, or the process working directory.
pub fn resolve_workdir(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => std::env::current_dir().context("Failed to determine current directory"),
    }
}

/// Run `git init` at `path` unless it already has a `.git` directory.
pub fn ensure_repository(path: &Path) -> Result<InitOutcome, StepError> {
    if scm::is_repo(path) {
        log::debug!("{} is already a git repository", path.display());
        return Ok(InitOutcome::AlreadyInitialized);
    }

    GitScm::init(path)?;
    log::info!("Initialized git repository in {}", path.display());
    Ok(InitOutcome::Initialized)
}

/// Record the selected identity in the repository-local config.
pub fn apply_identity(scm: &dyn Scm, credentials: &Credentials) -> Result<(), StepError> {
    scm.set_config("user.name", &credentials.username)?;
    scm.set_config("user.email", &credentials.email)?;
    Ok(())
}

/// Stage everything and commit it. An empty index skips the commit.
pub fn commit_changes(scm: &dyn Scm, message: &str) -> Result<CommitOutcome, StepError> {
    scm.stage_all()?;

    if !scm.has_staged_changes()? {
        log::warn!("Nothing to commit, continuing with existing history");
        return Ok(CommitOutcome::NothingToCommit);
    }

    scm.commit(message)?;
    Ok(CommitOutcome::Committed)
}

/// Create `name` if it is not an existing branch, then check it out.
pub fn ensure_branch(scm: &dyn Scm, name: &str) -> Result<BranchOutcome, StepError> {
    let branches = scm.list_branches(name)?;

    let outcome = if branches.iter().any(|b| b == name) {
        BranchOutcome::Existing
    } else {
        scm.create_branch(name)?;
        log::info!("Created branch '{}'", name);
        BranchOutcome::Created
    };

    scm.checkout(name)?;
    Ok(outcome)
}

/// Add the remote unless one with the same name is configured. URLs are not compared.
pub fn ensure_remote(scm: &dyn Scm, name: &str, url: &str) -> Result<RemoteOutcome, StepError> {
    let remotes = scm.list_remotes()?;

    println!("{}", SEPARATOR);
    if remotes.iter().any(|r| r == name) {
        println!(
            "{}",
            format!("Remote '{name}' already exists, skipping creation.").yellow()
        );
        Ok(RemoteOutcome::AlreadyExists)
    } else {
        scm.add_remote(name, url)?;
        println!("{}", format!("Remote '{name}' created.").green());
        Ok(RemoteOutcome::Added)
    }
}

/// Echo the selected profile before publishing
pub fn print_profile(choice: &Choice, credentials: &Credentials) {
    println!("{}", SEPARATOR);
    println!("  {} {}", "Service:".cyan(), choice.service);
    println!("  {} {}", "Key:".cyan(), choice.key);
    println!("  {} {}", "Username:".cyan(), credentials.username);
    println!("  {} {}", "Email:".cyan(), credentials.email);
    println!("  {} {}", "Remote:".cyan(), credentials.remote_name);
    println!("  {} {}", "URL:".cyan(), credentials.remote_url);
    println!("{}", SEPARATOR);
}

/// Run identity, stage/commit, branch, remote and push, stopping at the first failure.
pub fn run(scm: &dyn Scm, choice: &Choice, plan: &PushPlan) -> Result<PipelineReport, StepError> {
    let creds = &plan.credentials;

    apply_identity(scm, creds)?;

    let commit = commit_changes(scm, &plan.message)?;
    let branch = ensure_branch(scm, &plan.branch)?;
    let remote = ensure_remote(scm, &creds.remote_name, &creds.remote_url)?;

    print_profile(choice, creds);

    scm.push(&creds.remote_name, &plan.branch)?;

    if let Err(e) = log_to_file(&format!(
        "Pushed '{}' to '{}' ({}) as {} <{}>",
        plan.branch, creds.remote_name, creds.remote_url, creds.username, creds.email
    )) {
        log::debug!("Could not write log file: {}", e);
    }

    Ok(PipelineReport {
        commit,
        branch,
        remote,
    })
}
