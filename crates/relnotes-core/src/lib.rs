//! Relnotes Core - Core library for changelog generation
//!
//! This crate provides the error taxonomy, configuration loading and the
//! changelog file writer shared by the other relnotes crates.

pub mod config;
pub mod error;
pub mod writer;

pub use error::{ChangelogError, ConfigError, GitError, RelnotesError, Result};
