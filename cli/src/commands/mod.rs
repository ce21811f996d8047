//! # nbstack Command Dispatcher
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module defines every command nbstack understands and routes each one
//! to the module that builds its external invocation. The command table is the
//! `StackCommand` enum; `dispatch` matches on it exhaustively, so adding a
//! variant without handling it is a compile error.
//!
//! ## Command Groups
//!
//! - `stack`: Compose lifecycle (`up`, `down`, `restart`, `logs`, `status`)
//! - `netbox`: NetBox management commands (`nb-*`)
//! - `nautobot`: Nautobot management commands (`na-*`)
//! - `backup`: The project's `backup.sh` / `restore.sh` scripts
//!
//! ## Flow
//!
//! 1. `main` parses `nbstack <command> [args...]` into a `StackCommand`.
//!    Parse failures (missing or unknown command) go through
//!    `report_parse_error`, which prints the usage listing and yields exit code 1.
//! 2. `dispatch` asks the command's module for its banner and `Invocation`.
//! 3. The banner is printed, the invocation runs to completion, and a non-zero
//!    exit becomes `StackError::SubprocessFailure` carrying the child's code.
//!
use crate::common::process::{Invocation, ProcessRunner};
use crate::core::config::{self, Config};
use crate::core::error::{Result, StackError};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::Subcommand;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

mod backup;
mod nautobot;
mod netbox;
mod stack;

pub use backup::RestoreArgs;

/// # Stack Commands (`StackCommand`)
///
/// All commands available as `nbstack <command>`. The first doc line of each
/// variant doubles as its entry in the usage listing.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum StackCommand {
    /// Start the stack
    Up,
    /// Stop the stack
    Down,
    /// Restart applications
    Restart,
    /// Show logs
    Logs,
    /// Show container status
    Status,
    /// Create NetBox superuser
    #[command(name = "nb-create-superuser")]
    NbCreateSuperuser,
    /// Open NetBox Django shell
    #[command(name = "nb-shell")]
    NbShell,
    /// Collect NetBox static files
    #[command(name = "nb-collectstatic")]
    NbCollectstatic,
    /// Create Nautobot superuser
    #[command(name = "na-create-superuser")]
    NaCreateSuperuser,
    /// Open Nautobot Django shell
    #[command(name = "na-shell")]
    NaShell,
    /// Create backup
    Backup,
    /// Restore from backup
    Restore(RestoreArgs),
}

/// Everything a command needs to build its invocation.
#[derive(Debug, Clone)]
pub struct StackContext {
    /// Directory every subprocess runs in.
    pub project_dir: PathBuf,
    /// Env file holding the stack secrets.
    pub env_file: PathBuf,
    pub config: Config,
}

impl StackContext {
    /// Builds the context. `env_file` overrides the configured env file.
    pub fn new(project_dir: PathBuf, config: Config, env_file: Option<&Path>) -> Self {
        let env_file = match env_file {
            Some(path) => config::resolve_in(&project_dir, path),
            None => config::resolve_in(&project_dir, &config.env_file),
        };
        Self {
            project_dir,
            env_file,
            config,
        }
    }

    /// `<program> compose`, running in the project directory.
    pub(crate) fn compose(&self) -> Invocation {
        Invocation::new(&self.config.compose.program)
            .arg("compose")
            .current_dir(&self.project_dir)
    }

    /// Bare container CLI (no `compose`), running in the project directory.
    pub(crate) fn container_cli(&self) -> Invocation {
        Invocation::new(&self.config.compose.program).current_dir(&self.project_dir)
    }
}

/// What a command prints before it runs, and what it runs.
pub(crate) struct Action {
    pub banner: String,
    pub invocation: Invocation,
}

impl Action {
    pub(crate) fn new(banner: impl Into<String>, invocation: Invocation) -> Self {
        Self {
            banner: banner.into(),
            invocation,
        }
    }
}

/// Resolves `command` to its action without running anything.
fn plan(command: &StackCommand, ctx: &StackContext) -> Result<Action> {
    match command {
        StackCommand::Up => Ok(stack::up(ctx)),
        StackCommand::Down => Ok(stack::down(ctx)),
        StackCommand::Restart => Ok(stack::restart(ctx)),
        StackCommand::Logs => Ok(stack::logs(ctx)),
        StackCommand::Status => Ok(stack::status(ctx)),
        StackCommand::NbCreateSuperuser => Ok(netbox::create_superuser(ctx)),
        StackCommand::NbShell => Ok(netbox::shell(ctx)),
        StackCommand::NbCollectstatic => Ok(netbox::collectstatic(ctx)),
        StackCommand::NaCreateSuperuser => nautobot::create_superuser(ctx),
        StackCommand::NaShell => Ok(nautobot::shell(ctx)),
        StackCommand::Backup => Ok(backup::backup(ctx)),
        StackCommand::Restore(args) => backup::restore(ctx, args),
    }
}

/// # Dispatch (`dispatch`)
///
/// Runs `command` through `runner`.
///
/// ## Returns
///
/// * `Ok(())` if the wrapped process exited 0.
/// * `Err(StackError::SubprocessFailure)` carrying the child's exit code otherwise.
/// * Any preparation error (`ConfigurationMissing`, `MissingArgument`, ...)
///   before a process is started; in that case nothing is run.
pub async fn dispatch<R: ProcessRunner>(
    command: &StackCommand,
    ctx: &StackContext,
    runner: &R,
) -> Result<()> {
    debug!("Dispatching {:?} in {}", command, ctx.project_dir.display());
    let action = plan(command, ctx)?;
    println!("{}", action.banner);

    let code = runner.run(&action.invocation).await?;
    if code != 0 {
        return Err(StackError::SubprocessFailure {
            cmd: action.invocation.to_string(),
            code,
        }
        .into());
    }
    info!("Command '{}' completed successfully.", action.invocation);
    Ok(())
}

/// Enumerated listing of every command, one per line.
pub fn usage_listing() -> String {
    let cmd = StackCommand::augment_subcommands(clap::Command::new("nbstack"));
    let mut listing = String::from("Available commands:\n");
    for sub in cmd.get_subcommands().filter(|sub| sub.get_name() != "help") {
        let mut name = sub.get_name().to_string();
        for positional in sub.get_positionals() {
            name.push_str(&format!(" <{}>", positional.get_id()));
        }
        let about = sub.get_about().map(|a| a.to_string()).unwrap_or_default();
        listing.push_str(&format!("  {:<22}- {}\n", name, about));
    }
    listing
}

/// Reports a command-line parse failure and returns the exit code to use.
///
/// Help and version requests exit 0. A missing or unknown command prints the
/// usage listing and exits 1, as does any other argument error.
pub fn report_parse_error(err: clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            0
        }
        ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            print!("{}", usage_listing());
            1
        }
        ErrorKind::InvalidSubcommand => {
            let name = match err.get(ContextKind::InvalidSubcommand) {
                Some(ContextValue::String(name)) => name.clone(),
                _ => String::from("<unknown>"),
            };
            eprintln!("❌ {}", StackError::UnknownCommand(name));
            print!("{}", usage_listing());
            1
        }
        _ => {
            let _ = err.print();
            1
        }
    }
}
