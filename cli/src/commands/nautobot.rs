//! # nbstack Nautobot Commands
//!
//! File: cli/src/commands/nautobot.rs
//!
//! ## Overview
//!
//! `na-*` commands, run inside the Nautobot service container through
//! `nautobot-server`.
//!
//! `na-create-superuser` is non-interactive: it reads the superuser name,
//! email and password from the project's env file and hands them to Django as
//! `DJANGO_SUPERUSER_*` variables on the `docker compose exec` command line.
//! The password is registered as a secret so it never shows up in logs.
//!
//! Expected env file keys:
//!
//! ```text
//! NAUTOBOT_SUPERUSER_NAME=admin
//! NAUTOBOT_SUPERUSER_EMAIL=admin@example.com
//! NAUTOBOT_SUPERUSER_PASSWORD=change-me
//! ```
//!
use super::{Action, StackContext};
use crate::common::process::Invocation;
use crate::core::env_file::EnvFile;
use crate::core::error::Result;
use tracing::debug;

const SUPERUSER_NAME_KEY: &str = "NAUTOBOT_SUPERUSER_NAME";
const SUPERUSER_EMAIL_KEY: &str = "NAUTOBOT_SUPERUSER_EMAIL";
const SUPERUSER_PASSWORD_KEY: &str = "NAUTOBOT_SUPERUSER_PASSWORD";

/// `docker compose exec [env...] <nautobot> nautobot-server <args...>`
fn nautobot_server(ctx: &StackContext, exec: Invocation, args: &[&str]) -> Invocation {
    exec.arg(&ctx.config.services.nautobot)
        .arg("nautobot-server")
        .args(args.iter().copied())
}

pub(super) fn create_superuser(ctx: &StackContext) -> Result<Action> {
    let env = EnvFile::load(&ctx.env_file)?;
    debug!("Read {} entries from {}", env.len(), env.path().display());

    let exec = ctx
        .compose()
        .arg("exec")
        .arg("-e")
        .arg(format!(
            "DJANGO_SUPERUSER_USERNAME={}",
            env.require(SUPERUSER_NAME_KEY)?
        ))
        .arg("-e")
        .arg(format!(
            "DJANGO_SUPERUSER_EMAIL={}",
            env.require(SUPERUSER_EMAIL_KEY)?
        ))
        .secret_env(
            "DJANGO_SUPERUSER_PASSWORD",
            env.require(SUPERUSER_PASSWORD_KEY)?,
        );

    Ok(Action::new(
        "👤 Creating Nautobot superuser...",
        nautobot_server(ctx, exec, &["createsuperuser", "--noinput"]),
    ))
}

pub(super) fn shell(ctx: &StackContext) -> Action {
    Action::new(
        "🐍 Opening Nautobot Django shell...",
        nautobot_server(ctx, ctx.compose().arg("exec"), &["shell"]),
    )
}
