//! # nbstack Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout nbstack. Every failure
//! the tool can report is a variant of `StackError`, and each variant knows the
//! process exit code it maps to.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `StackError`: A custom error enum using `thiserror` for the domain failures
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover:
//! - Env file problems (missing file, malformed line, missing key)
//! - Command-line problems (unknown command, missing argument)
//! - Subprocess problems (spawn failure, non-zero exit)
//! - Invalid `nbstack.toml` settings
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if !path.exists() {
//!     return Err(StackError::ConfigurationMissing { path: path.to_path_buf() })?;
//! }
//!
//! // Pick the exit code for whatever went wrong
//! let code = exit_code_for(&err);
//! std::process::exit(code);
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for nbstack.
#[derive(Error, Debug)]
pub enum StackError {
    #[error("{} file not found. Run 'make init' first.", .path.display())]
    ConfigurationMissing { path: PathBuf },

    #[error(
        "Malformed entry in {} at line {line}: '{content}' (expected KEY=VALUE)",
        .path.display()
    )]
    MalformedEntry {
        path: PathBuf,
        line: usize,
        content: String,
    },

    #[error("Required setting '{key}' is not defined in {}", .path.display())]
    MissingSetting { key: String, path: PathBuf },

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Usage: nbstack {command} {usage}")]
    MissingArgument {
        command: &'static str,
        usage: &'static str,
    },

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{cmd}' exited with status {code}")]
    SubprocessFailure { cmd: String, code: i32 },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StackError {
    /// Exit code nbstack terminates with when this error reaches `main`.
    ///
    /// A failed subprocess forwards its own status; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            StackError::SubprocessFailure { code, .. } => *code,
            _ => 1,
        }
    }
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

/// Finds the exit code for an error chain.
///
/// Walks the chain looking for a `StackError`, so context added with
/// `.context(...)` does not hide a forwarded subprocess status.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<StackError>())
        .map_or(1, StackError::exit_code)
}
