//! Changelog formatters

mod markdown;

pub use markdown::{MarkdownFormatter, DEFAULT_HEADER};

use crate::types::{ChangelogDocument, VersionSection};

/// Trait for changelog formatters
pub trait ChangelogFormatter: Send + Sync {
    /// Render one version section
    fn format_section(&self, section: &VersionSection) -> String;

    /// Render a whole document: header, unreleased section, then versions
    fn format_document(&self, document: &ChangelogDocument) -> String;

    /// Get the file extension for this format
    fn extension(&self) -> &'static str;
}
