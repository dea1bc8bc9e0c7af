use thiserror::Error;

/// Failure of a single git step in the push pipeline.
///
/// Each variant carries git's stderr so the operator sees the same diagnostic
/// git printed. The pipeline stops at the first failing step; steps that
/// already completed are left as they are.
#[derive(Error, Debug)]
pub enum StepError {
    #[error("failed to run 'git {command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git init failed for '{path}': {stderr}")]
    InitFailed { path: String, stderr: String },

    #[error("staging changes failed: {0}")]
    StageFailed(String),

    #[error("commit failed: {0}")]
    CommitFailed(String),

    #[error("could not create or list branch '{branch}': {stderr}")]
    BranchFailed { branch: String, stderr: String },

    #[error("checkout of branch '{branch}' failed: {stderr}")]
    CheckoutFailed { branch: String, stderr: String },

    #[error("could not configure remote '{remote}': {stderr}")]
    RemoteFailed { remote: String, stderr: String },

    #[error("could not set '{key}' in repository config: {stderr}")]
    ConfigFailed { key: String, stderr: String },

    #[error(
        "push of '{branch}' to '{remote}' failed (exit code {code:?})\n\n\
        Possible causes:\n\
        1. Authentication failed - ensure credentials are configured\n\
        2. No permission to push to this repository\n\
        3. Network connectivity issues\n\
        4. The remote rejected a non-fast-forward update"
    )]
    PushFailed {
        remote: String,
        branch: String,
        code: Option<i32>,
    },
}

/// Problems with the selected credential record.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CredentialError {
    #[error("no credentials configured for service '{service}' and key '{key}'")]
    NotFound { service: String, key: String },

    #[error("credential '{service}.{key}' is missing required field '{field}'")]
    MissingField {
        service: String,
        key: String,
        field: &'static str,
    },

    #[error("credential '{service}.{key}' field '{field}' must be a string")]
    NotAString {
        service: String,
        key: String,
        field: &'static str,
    },
}

/// Reasons the selector could not produce a choice.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no credentials configured; add entries to {0}")]
    NoCredentials(String),

    #[error("invalid selection '{input}', please enter a number between 1 and {len}")]
    OutOfRange { input: String, len: usize },

    #[error("stdin is not a terminal; pass --select <N> to choose a credential")]
    NotInteractive,
}
