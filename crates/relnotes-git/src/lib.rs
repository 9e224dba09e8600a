//! Relnotes Git - Version-control queries for changelog generation
//!
//! This crate defines the [`VersionControl`] query interface consumed by the
//! changelog builder and provides two implementations: [`GitRepo`] on top of
//! libgit2 and [`GitCli`] driving the `git` executable.

mod cli;
mod commits;
mod repository;
mod tags;
pub mod types;
mod vcs;

pub use cli::{parse_log_output, parse_shortstat, GitCli};
pub use repository::{GitRepo, Result};
pub use types::{CommitRecord, DiffStats, TagInfo};
pub use vcs::{open_backend, VersionControl};
