//! # nbstack CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests: a command builder for the
//! compiled `nbstack` binary with a hermetic environment, and a scratch
//! project directory that can hold a `.env`, scripts, and a fake `docker`
//! executable which records its arguments instead of talking to Docker.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// File the fake `docker` appends its arguments to, inside the project directory.
pub const DOCKER_CALLS: &str = "docker-calls.log";

/// # Get nbstack Command (`nbstack_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `nbstack` binary with
/// the `NBSTACK_*` variables cleared so the caller's shell cannot leak in.
pub fn nbstack_cmd() -> Command {
    let mut cmd = Command::cargo_bin("nbstack").expect("Failed to find nbstack binary for testing");
    cmd.env_remove("NBSTACK_PROJECT_DIR")
        .env_remove("NBSTACK_ENV_FILE")
        .env_remove("RUST_LOG");
    cmd
}

/// A throwaway stack project directory.
pub struct Project {
    dir: TempDir,
    bin: PathBuf,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp project dir");
        fs::write(dir.path().join("docker-compose.yml"), "services: {}\n").unwrap();
        let bin = dir.path().join("bin");
        fs::create_dir(&bin).unwrap();
        Self { dir, bin }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Writes an executable shell script.
    #[cfg(unix)]
    pub fn write_script(&self, relative: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = self.write(relative, &format!("#!/bin/sh\n{}\n", body));
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Installs a fake `docker` that logs its arguments and exits with `code`.
    #[cfg(unix)]
    pub fn fake_docker(&self, code: i32) {
        self.write_script(
            "bin/docker",
            &format!(
                "printf '%s\\n' \"$*\" >> \"$(pwd)/{}\"\nexit {}",
                DOCKER_CALLS, code
            ),
        );
    }

    /// Arguments of every fake `docker` call, one line per call.
    pub fn docker_calls(&self) -> Vec<String> {
        fs::read_to_string(self.path().join(DOCKER_CALLS))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// `nbstack` pointed at this project, with the fake `bin/` first on PATH
    /// and the user config dir isolated.
    pub fn cmd(&self) -> Command {
        let mut cmd = nbstack_cmd();
        let path = std::env::var("PATH").unwrap_or_default();
        cmd.env("PATH", format!("{}:{}", self.bin.display(), path))
            .env("XDG_CONFIG_HOME", self.path().join("xdg-config"))
            .arg("--project-dir")
            .arg(self.path());
        cmd
    }
}
