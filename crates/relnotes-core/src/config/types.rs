//! Configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Changelog output configuration
    pub changelog: ChangelogConfig,

    /// Version-control access configuration
    pub git: GitConfig,
}

/// Changelog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Changelog file path, relative to the working directory
    pub file: PathBuf,

    /// Repository web URL used to build commit permalinks
    /// (e.g. `https://github.com/owner/repo`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,

    /// Header override for the generated document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    /// Whether to render commits after the newest tag as "Unreleased"
    pub include_unreleased: bool,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("CHANGELOG.md"),
            repository_url: None,
            header: None,
            include_unreleased: true,
        }
    }
}

impl ChangelogConfig {
    /// Base URL that a full commit id is appended to
    pub fn commit_url_base(&self) -> Option<String> {
        self.repository_url
            .as_deref()
            .map(|url| format!("{}/commit", url.trim_end_matches('/')))
    }
}

/// Which implementation answers version-control queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitBackend {
    /// In-process libgit2
    #[default]
    Libgit2,
    /// The `git` executable on PATH
    Cli,
}

/// Git configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Query backend
    pub backend: GitBackend,

    /// Ref treated as the working head
    pub head: String,

    /// Only tags matching this regular expression are version boundaries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_pattern: Option<String>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            backend: GitBackend::Libgit2,
            head: "HEAD".to_string(),
            tag_pattern: None,
        }
    }
}
