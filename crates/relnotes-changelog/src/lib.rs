//! Relnotes Changelog - Commit classification and changelog assembly
//!
//! Commits are sorted into Keep a Changelog categories by [`classify`],
//! grouped into [`VersionSection`]s per release by [`ChangelogBuilder`] and
//! rendered to markdown by [`MarkdownFormatter`].

pub mod classifier;
pub mod formatter;
pub mod generator;
pub mod release_context;
pub mod types;

#[cfg(test)]
mod testing;

pub use classifier::classify;
pub use formatter::{ChangelogFormatter, MarkdownFormatter, DEFAULT_HEADER};
pub use generator::{ChangelogBuilder, RangeOutcome, RangeRequest, ResolvedRange, UNRELEASED_LABEL};
pub use release_context::{resolve_context_range, ReleaseContext};
pub use types::{Category, CategoryGroup, ChangelogDocument, VersionSection};
