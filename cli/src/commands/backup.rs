//! # nbstack Backup & Restore Commands
//!
//! File: cli/src/commands/backup.rs
//!
//! ## Overview
//!
//! Runs the project's own backup and restore scripts. The scripts are opaque
//! to nbstack: `backup` runs `scripts/backup.sh` with no arguments, and
//! `restore <date>` runs `scripts/restore.sh <date>`. Both run from the
//! project directory; script locations can be changed in `nbstack.toml`.
//!
//! ## Usage
//!
//! ```bash
//! nbstack backup
//! nbstack restore 20240131_020000
//! ```
//!
use super::{Action, StackContext};
use crate::common::process::Invocation;
use crate::core::config;
use crate::core::error::{Result, StackError};
use clap::Args;

// Arguments for `nbstack restore`. Kept optional so a missing date is
// reported as a usage error without running anything.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RestoreArgs {
    /// Identifier of the backup to restore (the backup date)
    #[arg(allow_hyphen_values = true)]
    pub date: Option<String>,
}

fn script(ctx: &StackContext, path: &str) -> Invocation {
    let script = config::resolve_in(&ctx.project_dir, path);
    Invocation::new(script).current_dir(&ctx.project_dir)
}

pub(super) fn backup(ctx: &StackContext) -> Action {
    Action::new(
        "💾 Creating backup...",
        script(ctx, &ctx.config.scripts.backup),
    )
}

pub(super) fn restore(ctx: &StackContext, args: &RestoreArgs) -> Result<Action> {
    let date = args
        .date
        .as_deref()
        .filter(|date| !date.trim().is_empty())
        .ok_or(StackError::MissingArgument {
            command: "restore",
            usage: "<backup_date>",
        })?;
    Ok(Action::new(
        format!("📥 Restoring from backup {}...", date),
        script(ctx, &ctx.config.scripts.restore).arg(date),
    ))
}
