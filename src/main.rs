use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use git_quickpush::config::Settings;
use git_quickpush::credentials::CredentialStore;
use git_quickpush::error::SelectionError;
use git_quickpush::pipeline::{self, CommitOutcome, PushPlan};
use git_quickpush::scm::GitScm;
use git_quickpush::{logger, selector};

#[derive(Parser)]
#[command(name = "git-quickpush")]
#[command(about = "Stage, commit and push the current directory with a chosen credential profile", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Repository root (defaults to the current directory)
    #[arg(short, long, global = true)]
    repo: Option<PathBuf>,

    /// Credential file (defaults to Git_Data/config.json under the repository root)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Push options given before (or without) the `push` subcommand
    #[command(flatten)]
    push: PushArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Stage everything, commit, and push with a selected profile (default)
    Push(PushArgs),

    /// List the configured credential profiles
    List,
}

#[derive(Args)]
struct PushArgs {
    /// Commit message (prompted for when omitted)
    #[arg(short, long)]
    message: Option<String>,

    /// Profile number from the menu, skipping the interactive prompt
    #[arg(short, long)]
    select: Option<usize>,

    /// Branch to create, check out and push (defaults to settings, then "main")
    #[arg(short, long)]
    branch: Option<String>,
}

impl PushArgs {
    /// Fill unset options from `fallback`; values given here win.
    fn or(self, fallback: PushArgs) -> PushArgs {
        PushArgs {
            message: self.message.or(fallback.message),
            select: self.select.or(fallback.select),
            branch: self.branch.or(fallback.branch),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logger::init_logger() {
        eprintln!("{} logging disabled: {:#}", "warning:".yellow(), e);
    }

    let settings = Settings::load()?;
    let root = pipeline::resolve_workdir(cli.repo.as_deref())?;
    let credentials_path = cli
        .config
        .clone()
        .unwrap_or_else(|| settings.credentials_path(&root));

    match cli.command {
        Some(Commands::List) => list_profiles(&credentials_path),
        Some(Commands::Push(args)) => {
            push(&root, &credentials_path, &settings, args.or(cli.push))
        }
        None => push(&root, &credentials_path, &settings, cli.push),
    }
}

fn list_profiles(credentials_path: &Path) -> Result<()> {
    let store = CredentialStore::load(credentials_path);
    let choices = selector::flatten_choices(&store);
    selector::ensure_choices(&choices, &credentials_path.display().to_string())?;
    selector::print_menu(&store, &choices);
    Ok(())
}

fn push(root: &Path, credentials_path: &Path, settings: &Settings, args: PushArgs) -> Result<()> {
    let interactive = selector::is_interactive();

    let message = match args.message {
        Some(message) => message,
        None if interactive => selector::prompt_commit_message()?,
        None => bail!("stdin is not a terminal; pass --message <MSG> to set the commit message"),
    };

    pipeline::ensure_repository(root)
        .with_context(|| format!("Failed to prepare repository at {}", root.display()))?;

    let store = CredentialStore::load(credentials_path);
    let choices = selector::flatten_choices(&store);
    selector::ensure_choices(&choices, &credentials_path.display().to_string())?;

    let choice = match args.select {
        Some(n) => selector::select(&choices, &n.to_string())?.clone(),
        None if interactive => {
            selector::print_menu(&store, &choices);
            selector::prompt_choice(&choices)?
        }
        None => return Err(SelectionError::NotInteractive.into()),
    };

    let credentials = store
        .credentials(&choice.service, &choice.key)
        .context("Selected profile is incomplete")?;

    let plan = PushPlan {
        message,
        branch: args
            .branch
            .unwrap_or_else(|| settings.default_branch.clone()),
        credentials,
    };

    let scm = GitScm::new(root);
    let report = pipeline::run(&scm, &choice, &plan).context("Push pipeline stopped")?;

    if report.commit == CommitOutcome::NothingToCommit {
        println!("{}", "No changes to commit; pushed existing history.".yellow());
    }
    println!(
        "{}",
        format!(
            "✓ Pushed '{}' to '{}'",
            plan.branch, plan.credentials.remote_name
        )
        .green()
        .bold()
    );

    Ok(())
}
