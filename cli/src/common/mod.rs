//! # nbstack Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared utilities used by the command modules. Currently this is only
//! `process`, which describes and runs the external programs every command
//! wraps.
//!

/// Building and running external commands (`Invocation`, `ProcessRunner`).
pub mod process;
