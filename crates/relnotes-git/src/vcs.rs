//! Version-control query interface

use std::path::Path;

use chrono::NaiveDate;
use relnotes_core::config::{GitBackend, GitConfig};
use tracing::info;

use crate::cli::GitCli;
use crate::repository::{GitRepo, Result};
use crate::types::{CommitRecord, DiffStats};

/// The queries the changelog builder needs from version control.
///
/// Ordering contracts are part of the interface: tags and commits both come
/// back newest first.
pub trait VersionControl {
    /// Release tags, newest first by version precedence
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Commits reachable from `to` but not from `from`, newest first,
    /// merge commits excluded
    fn commits_between(&self, from: &str, to: &str) -> Result<Vec<CommitRecord>>;

    /// Calendar date of the commit a ref points to, `None` when the ref
    /// does not exist
    fn tag_date(&self, tag: &str) -> Result<Option<NaiveDate>>;

    /// Id of the root commit of the working head
    fn first_commit_id(&self) -> Result<String>;

    /// Line statistics between two refs
    fn diff_stats(&self, from: &str, to: &str) -> Result<DiffStats>;

    /// Ref naming the working head
    fn head_ref(&self) -> &str;
}

/// Open the configured backend for the repository containing `path`
pub fn open_backend(config: &GitConfig, path: &Path) -> Result<Box<dyn VersionControl>> {
    info!(backend = ?config.backend, path = %path.display(), "opening version-control backend");

    let backend: Box<dyn VersionControl> = match config.backend {
        GitBackend::Libgit2 => {
            let mut repo = GitRepo::discover(path)?.with_head(&config.head);
            if let Some(pattern) = &config.tag_pattern {
                repo = repo.with_tag_pattern(pattern)?;
            }
            Box::new(repo)
        }
        GitBackend::Cli => {
            let mut git = GitCli::open(path)?.with_head(&config.head);
            if let Some(pattern) = &config.tag_pattern {
                git = git.with_tag_pattern(pattern)?;
            }
            Box::new(git)
        }
    };

    Ok(backend)
}
