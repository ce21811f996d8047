//! # nbstack Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! Every nbstack command ends in exactly one external process: `docker`
//! (or the configured container CLI) or one of the backup/restore scripts.
//! This module describes that process as an `Invocation` and runs it.
//!
//! ## Architecture
//!
//! - `Invocation`: program, argv, working directory, and which arguments
//!   carry secret values. Its `Display` and `Debug` output mask those values,
//!   so it is safe to log.
//! - `ProcessRunner`: the seam between the dispatcher and the OS. Returns the
//!   child's exit code; it does not treat non-zero as an error.
//! - `SystemRunner`: the real implementation on `tokio::process::Command`,
//!   with stdin/stdout/stderr inherited so interactive shells and
//!   `logs -f` behave as if run directly.
//!
//! Arguments are passed as an argv vector, never through `sh -c`.
//!
use crate::core::error::{Result, StackError};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tracing::{debug, info};

const MASK: &str = "****";

/// A single external command to run.
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    program: OsString,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    /// Indices into `args` of `KEY=VALUE` arguments whose value is masked.
    secrets: Vec<usize>,
}

impl Invocation {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            secrets: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Adds `-e KEY=VALUE`, masking `value` in any displayed form.
    pub fn secret_env(mut self, key: &str, value: &str) -> Self {
        self.args.push("-e".to_string());
        self.secrets.push(self.args.len());
        self.args.push(format!("{}={}", key, value));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_current_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// The argument at `index` as it may be shown to the user.
    fn shown_arg(&self, index: usize) -> String {
        let arg = &self.args[index];
        if !self.secrets.contains(&index) {
            return arg.clone();
        }
        match arg.split_once('=') {
            Some((key, _)) => format!("{}={}", key, MASK),
            None => MASK.to_string(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for index in 0..self.args.len() {
            let shown = self.shown_arg(index);
            if shown.is_empty() || shown.chars().any(|c| c.is_whitespace() || c == '\'') {
                write!(f, " '{}'", shown.replace('\'', r"'\''"))?;
            } else {
                write!(f, " {}", shown)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("command", &format_args!("{}", self))
            .field("cwd", &self.cwd)
            .finish()
    }
}

/// Runs invocations to completion and reports their exit code.
pub trait ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<i32>;
}

/// Spawns real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<i32> {
        info!("Executing command: {}", invocation);
        let mut command = tokio::process::Command::new(invocation.program());
        command.args(invocation.get_args());
        if let Some(dir) = invocation.get_current_dir() {
            debug!("Setting CWD for command to {}", dir.display());
            command.current_dir(dir);
        }
        command.stdin(Stdio::inherit());
        command.stdout(Stdio::inherit());
        command.stderr(Stdio::inherit());

        let status = command.status().await.map_err(|source| StackError::Spawn {
            program: invocation.program().to_string_lossy().into_owned(),
            source,
        })?;
        let code = exit_code(status);
        debug!("Command '{}' finished with exit code {}", invocation, code);
        Ok(code)
    }
}

/// Numeric exit code of a finished child; signal deaths map to `128 + signal`.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
