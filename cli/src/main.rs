//! # nbstack Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the nbstack CLI, the manager
//! for a Docker Compose based NetBox + Nautobot stack. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Resolving the project directory and loading configuration
//! - Dispatching the command and turning its outcome into the exit code
//!
//! ## Exit Codes
//!
//! - `0`: the wrapped command succeeded (or `--help` / `--version`)
//! - `1`: missing or unknown command, missing `.env`, bad configuration,
//!   missing argument, or a program that could not be started
//! - anything else: the wrapped command's own exit code, unchanged
//!
//! ## Examples
//!
//! ```bash
//! # Start the stack
//! nbstack up
//!
//! # Create the Nautobot superuser from .env, with debug logging
//! nbstack -vv na-create-superuser
//!
//! # Restore a backup for a stack checked out elsewhere
//! nbstack --project-dir /srv/netbox-nautobot restore 20240131
//! ```
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command table and dispatcher
mod common; // Process execution
mod core; // Errors, configuration, env file loading

use crate::core::{config, error};

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "nbstack",
    about = "NetBox + Nautobot Stack Manager",
    long_about = "Manage the NetBox + Nautobot Docker Compose stack.\n\
                  Wraps docker compose, Django management commands and the backup/restore scripts.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: commands::StackCommand,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Directory holding the compose file, .env and scripts/
    /// (default: nearest ancestor with a compose file)
    #[arg(long, short = 'C', env = "NBSTACK_PROJECT_DIR", global = true)]
    project_dir: Option<PathBuf>,
    /// Env file to read secrets from, relative to the project directory
    #[arg(long, env = "NBSTACK_ENV_FILE", global = true)]
    env_file: Option<PathBuf>,
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

async fn run(cli: Cli) -> error::Result<()> {
    let project_dir = config::resolve_project_dir(cli.project_dir.as_deref())?;
    let cfg = config::load_config(&project_dir)?;
    let ctx = commands::StackContext::new(project_dir, cfg, cli.env_file.as_deref());
    commands::dispatch(&cli.command, &ctx, &common::process::SystemRunner).await
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => std::process::exit(commands::report_parse_error(err)),
    };
    init_logging(cli.verbose);
    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = run(cli).await {
        let code = error::exit_code_for(&e);
        match e.downcast_ref::<error::StackError>() {
            Some(error::StackError::SubprocessFailure { .. }) => {
                tracing::warn!("{}", e);
            }
            _ => {
                tracing::error!("Command execution failed: {:?}", e);
                eprintln!("❌ {:#}", e);
            }
        }
        std::process::exit(code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_command() {
        let cli = Cli::try_parse_from(["nbstack", "up", "-vv", "--project-dir", "/srv/stack"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.project_dir, Some(PathBuf::from("/srv/stack")));
        assert_eq!(cli.command, commands::StackCommand::Up);
    }
}
