//! # git-quickpush
//!
//! A command-line shortcut for the "commit everything and push it" routine.
//!
//! ## Overview
//!
//! `git-quickpush` keeps a small JSON file of credential profiles (username,
//! email, remote name and remote URL, grouped by service) next to the project,
//! by default at `Git_Data/config.json`. A run asks for a commit message, lets
//! the operator pick a profile from a numbered menu, and then drives the
//! `git` binary through a fixed sequence:
//!
//! 1. `git init` if the directory is not a repository yet
//! 2. set `user.name` / `user.email` from the profile
//! 3. stage everything and commit
//! 4. create the branch if needed and check it out
//! 5. add the remote if it is not configured
//! 6. push the branch to the remote
//!
//! The first failing step stops the run with a typed [`error::StepError`].
//!
//! ## Architecture
//!
//! - Configuration ([`config`], [`credentials`])
//! - Operator interaction ([`selector`])
//! - Version control ([`scm`], [`pipeline`])
//! - Diagnostics ([`error`], [`logger`])

/// Platform config directory and user settings (`config.toml`).
pub mod config;

/// Credential profiles loaded from the JSON credential file.
///
/// Loading is lenient: a missing or malformed file yields an empty store.
/// Individual records are validated only when a profile is selected.
pub mod credentials;

/// Typed errors for pipeline steps, credential lookups and selection.
pub mod error;

/// Logging configuration and utilities.
pub mod logger;

/// The ordered push pipeline and its idempotent "ensure" steps.
pub mod pipeline;

/// Git access through the [`scm::Scm`] trait and its CLI implementation.
pub mod scm;

/// Numbered profile menu and the commit-message prompt.
pub mod selector;
