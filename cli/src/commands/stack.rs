//! # nbstack Stack Lifecycle Commands
//!
//! File: cli/src/commands/stack.rs
//!
//! ## Overview
//!
//! Compose-level commands that act on the whole stack: `up`, `down`,
//! `restart`, `logs` and `status`. Each one is a single call to the configured
//! container CLI (`docker` by default) made from the project directory.
//!
//! ## Usage
//!
//! ```bash
//! nbstack up        # docker compose up -d
//! nbstack down      # docker compose down
//! nbstack restart   # docker compose restart netbox nautobot
//! nbstack logs      # docker compose logs -f --tail=200
//! nbstack status    # docker ps --format 'table {{.Names}}\t{{.Ports}}\t{{.Status}}'
//! ```
//!
use super::{Action, StackContext};

/// Go template handed to `docker ps`. The `\t` stays literal; docker expands it.
const STATUS_FORMAT: &str = "table {{.Names}}\\t{{.Ports}}\\t{{.Status}}";

pub(super) fn up(ctx: &StackContext) -> Action {
    Action::new(
        "🚀 Starting NetBox + Nautobot stack...",
        ctx.compose().args(["up", "-d"]),
    )
}

pub(super) fn down(ctx: &StackContext) -> Action {
    Action::new(
        "🛑 Stopping NetBox + Nautobot stack...",
        ctx.compose().arg("down"),
    )
}

/// Restarts only the two application services, leaving databases and caches up.
pub(super) fn restart(ctx: &StackContext) -> Action {
    let services = &ctx.config.services;
    Action::new(
        "🔄 Restarting applications...",
        ctx.compose()
            .arg("restart")
            .arg(&services.netbox)
            .arg(&services.nautobot),
    )
}

pub(super) fn logs(ctx: &StackContext) -> Action {
    Action::new(
        "📋 Showing logs (Ctrl+C to exit)...",
        ctx.compose()
            .args(["logs", "-f"])
            .arg(format!("--tail={}", ctx.config.compose.log_tail)),
    )
}

pub(super) fn status(ctx: &StackContext) -> Action {
    Action::new(
        "📊 Container status:",
        ctx.container_cli().args(["ps", "--format", STATUS_FORMAT]),
    )
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{ComposeConfig, Config, ServicesConfig};
    use std::path::PathBuf;

    fn context(config: Config) -> StackContext {
        StackContext::new(PathBuf::from("/srv/stack"), config, None)
    }

    #[test]
    fn test_default_invocations() {
        let ctx = context(Config::default());
        assert_eq!(up(&ctx).invocation.to_string(), "docker compose up -d");
        assert_eq!(down(&ctx).invocation.to_string(), "docker compose down");
        assert_eq!(
            restart(&ctx).invocation.to_string(),
            "docker compose restart netbox nautobot"
        );
        assert_eq!(
            logs(&ctx).invocation.to_string(),
            "docker compose logs -f --tail=200"
        );
    }

    #[test]
    fn test_status_uses_plain_docker_ps() {
        let ctx = context(Config::default());
        let action = status(&ctx);
        assert_eq!(action.banner, "📊 Container status:");
        assert_eq!(
            action.invocation.get_args(),
            &["ps", "--format", "table {{.Names}}\\t{{.Ports}}\\t{{.Status}}"]
        );
    }

    #[test]
    fn test_configured_program_and_services() {
        let ctx = context(Config {
            compose: ComposeConfig {
                program: "podman".into(),
                log_tail: 50,
            },
            services: ServicesConfig {
                netbox: "netbox-web".into(),
                nautobot: "nautobot-web".into(),
            },
            ..Default::default()
        });
        assert_eq!(
            restart(&ctx).invocation.to_string(),
            "podman compose restart netbox-web nautobot-web"
        );
        assert_eq!(
            logs(&ctx).invocation.to_string(),
            "podman compose logs -f --tail=50"
        );
    }
}
