//! # nbstack Env File Loader
//!
//! File: cli/src/core/env_file.rs
//!
//! ## Overview
//!
//! Loads the stack's `.env` file (`KEY=VALUE` per line) into an `EnvFile`
//! value. The process environment is never touched; commands that need a
//! setting (currently only `na-create-superuser`) receive the `EnvFile` as a
//! parameter and read from it.
//!
//! ## Format
//!
//! - Each line is trimmed before it is inspected.
//! - Empty lines and lines starting with `#` are skipped.
//! - Everything else is split on the first `=`. The key is trimmed; the value
//!   is kept verbatim, so quotes and `$` reach the subprocess unchanged.
//! - A line without `=`, or with an empty key, aborts the load with
//!   `StackError::MalformedEntry`.
//! - A key that appears twice keeps the later value.
//!
//! ## Examples
//!
//! ```rust
//! let env = EnvFile::load(Path::new(".env"))?;
//! let email = env.require("NAUTOBOT_SUPERUSER_EMAIL")?;
//! ```
//!
use crate::core::error::{Result, StackError};
use anyhow::Context;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Key/value settings loaded from an env file.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    path: PathBuf,
    entries: HashMap<String, String>,
}

/// Shows the path and the keys only; the file holds credentials.
impl fmt::Debug for EnvFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("EnvFile")
            .field("path", &self.path)
            .field("keys", &keys)
            .finish()
    }
}

impl EnvFile {
    /// Loads and parses the env file at `path`.
    ///
    /// Fails with `StackError::ConfigurationMissing` if the file does not
    /// exist and with `StackError::MalformedEntry` on the first line that is
    /// not `KEY=VALUE`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(StackError::ConfigurationMissing {
                path: path.to_path_buf(),
            }
            .into());
        }
        info!("Loading environment from: {}", path.display());
        let file = File::open(path)
            .with_context(|| format!("Failed to open env file: {}", path.display()))?;
        Self::from_reader(path, BufReader::new(file))
    }

    /// Parses env lines from any buffered reader. `path` is only used in
    /// error messages.
    pub fn from_reader<R: BufRead>(path: &Path, reader: R) -> Result<Self> {
        let mut entries = HashMap::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line
                .with_context(|| format!("Failed to read env file: {}", path.display()))?;
            let Some((key, value)) = parse_line(path, index + 1, &line)? else {
                continue;
            };
            if entries.insert(key.to_string(), value.to_string()).is_some() {
                debug!("Env key '{}' redefined at line {}", key, index + 1);
            }
        }
        let env = Self {
            path: path.to_path_buf(),
            entries,
        };
        if env.is_empty() {
            warn!("No entries found in {}", path.display());
        }
        debug!("Loaded {} env entries from {}", env.len(), path.display());
        Ok(env)
    }

    /// Path the entries were loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the value for `key`, or `StackError::MissingSetting`.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| {
            StackError::MissingSetting {
                key: key.to_string(),
                path: self.path.clone(),
            }
            .into()
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses a single line. `Ok(None)` for blanks and comments.
fn parse_line<'a>(
    path: &Path,
    number: usize,
    line: &'a str,
) -> Result<Option<(&'a str, &'a str)>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    match trimmed.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok(Some((key.trim(), value))),
        _ => Err(StackError::MalformedEntry {
            path: path.to_path_buf(),
            line: number,
            content: trimmed.to_string(),
        }
        .into()),
    }
}
