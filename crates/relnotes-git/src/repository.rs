//! Git repository operations

use std::path::Path;

use chrono::NaiveDate;
use git2::{Oid, Repository};
use regex::Regex;
use tracing::{debug, info, instrument};

use relnotes_core::error::GitError;

use crate::types::{CommitRecord, DiffStats};
use crate::vcs::VersionControl;

/// Result type for git operations
pub type Result<T> = std::result::Result<T, GitError>;

/// libgit2-backed repository
pub struct GitRepo {
    pub(crate) repo: Repository,
    pub(crate) head: String,
    pub(crate) tag_filter: Option<Regex>,
}

impl GitRepo {
    /// Open a repository at the given path
    #[instrument(fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "opening git repository");
        let repo = Repository::open(path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                GitError::RepositoryNotFound(path.to_path_buf())
            } else {
                GitError::OpenFailed(e.to_string())
            }
        })?;

        Ok(Self::from_repository(repo))
    }

    /// Discover and open a repository by searching parent directories
    #[instrument(fields(start_path = %start_path.display()))]
    pub fn discover(start_path: &Path) -> Result<Self> {
        info!(start_path = %start_path.display(), "discovering git repository");
        let repo = Repository::discover(start_path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                GitError::NotARepository(start_path.to_path_buf())
            } else {
                GitError::OpenFailed(e.to_string())
            }
        })?;

        let path = repo.workdir().unwrap_or_else(|| repo.path());
        debug!(path = %path.display(), "repository discovered");

        Ok(Self::from_repository(repo))
    }

    fn from_repository(repo: Repository) -> Self {
        Self {
            repo,
            head: "HEAD".to_string(),
            tag_filter: None,
        }
    }

    /// Use a different ref as the working head
    pub fn with_head(mut self, head: impl Into<String>) -> Self {
        self.head = head.into();
        self
    }

    /// Only treat tags matching `pattern` as version boundaries
    pub fn with_tag_pattern(mut self, pattern: &str) -> Result<Self> {
        let regex =
            Regex::new(pattern).map_err(|e| GitError::InvalidTagPattern(e.to_string()))?;
        self.tag_filter = Some(regex);
        Ok(self)
    }

    /// Resolve any revision spec to the commit it names
    pub(crate) fn resolve_commit(&self, spec: &str) -> Result<Oid> {
        let object = self.repo.revparse_single(spec).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                GitError::RefNotFound(spec.to_string())
            } else {
                GitError::Git2(e)
            }
        })?;
        Ok(object.peel_to_commit()?.id())
    }
}

impl VersionControl for GitRepo {
    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.sorted_tags()?.into_iter().map(|t| t.name).collect())
    }

    fn commits_between(&self, from: &str, to: &str) -> Result<Vec<CommitRecord>> {
        GitRepo::commits_between(self, from, to)
    }

    fn tag_date(&self, tag: &str) -> Result<Option<NaiveDate>> {
        GitRepo::tag_date(self, tag)
    }

    fn first_commit_id(&self) -> Result<String> {
        GitRepo::first_commit_id(self)
    }

    fn diff_stats(&self, from: &str, to: &str) -> Result<DiffStats> {
        GitRepo::diff_stats(self, from, to)
    }

    fn head_ref(&self) -> &str {
        &self.head
    }
}
