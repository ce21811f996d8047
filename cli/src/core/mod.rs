//! # nbstack Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundations shared by every command:
//! - `config`: `nbstack.toml` loading, merging and validation, plus project directory resolution
//! - `env_file`: Loading the stack's `.env` secrets into an explicit `EnvFile` value
//! - `error`: The `StackError` taxonomy and the `Result` alias
//!
//! ```rust
//! use crate::core::config;
//! use crate::core::env_file::EnvFile;
//! use crate::core::error::{Result, StackError};
//! ```
//!
pub mod config;
pub mod env_file;
pub mod error;
