//! # nbstack NetBox Commands
//!
//! File: cli/src/commands/netbox.rs
//!
//! ## Overview
//!
//! `nb-*` commands: Django management commands run inside the NetBox service
//! container through `docker compose exec <netbox> python manage.py ...`.
//! `nb-create-superuser` and `nb-shell` are interactive and rely on the
//! inherited terminal.
//!
use super::{Action, StackContext};
use crate::common::process::Invocation;

/// `docker compose exec <netbox> python manage.py <args...>`
fn manage_py<'a>(ctx: &StackContext, args: impl IntoIterator<Item = &'a str>) -> Invocation {
    ctx.compose()
        .arg("exec")
        .arg(&ctx.config.services.netbox)
        .args(["python", "manage.py"])
        .args(args)
}

pub(super) fn create_superuser(ctx: &StackContext) -> Action {
    Action::new(
        "👤 Creating NetBox superuser...",
        manage_py(ctx, ["createsuperuser"]),
    )
}

pub(super) fn shell(ctx: &StackContext) -> Action {
    Action::new("🐍 Opening NetBox Django shell...", manage_py(ctx, ["shell"]))
}

pub(super) fn collectstatic(ctx: &StackContext) -> Action {
    Action::new(
        "📦 Collecting NetBox static files...",
        manage_py(ctx, ["collectstatic", "--noinput"]),
    )
}
