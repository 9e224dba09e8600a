//! Changelog generation
//!
//! [`ChangelogBuilder`] walks the tag list and turns each adjacent pair of
//! tags into a [`VersionSection`]. A failure on one boundary only affects that
//! section; a failure to list tags stops the whole build.

use chrono::NaiveDate;
use relnotes_core::config::ChangelogConfig;
use relnotes_core::error::ChangelogError;
use relnotes_core::Result;
use relnotes_git::{CommitRecord, VersionControl};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::formatter::DEFAULT_HEADER;
use crate::types::{ChangelogDocument, VersionSection};

/// Label of the section collecting commits after the newest tag
pub const UNRELEASED_LABEL: &str = "Unreleased";

/// A single range to render, as given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRequest {
    /// Version label; when `from` is absent it is also the end of the range
    pub version: Option<String>,
    /// Start of the range (exclusive)
    pub from: Option<String>,
    /// End of the range when `from` is given
    pub to: String,
}

impl RangeRequest {
    /// Range ending at `to`
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            version: None,
            from: None,
            to: to.into(),
        }
    }

    /// Set the version label
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the start of the range
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }
}

/// Concrete refs a [`RangeRequest`] resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRange {
    /// Section label
    pub label: String,
    /// Start ref (exclusive)
    pub from: String,
    /// End ref (inclusive)
    pub to: String,
}

/// Result of rendering a single range
#[derive(Debug, Clone)]
pub enum RangeOutcome {
    /// The range holds no commits
    Empty(ResolvedRange),
    /// The range produced a section
    Section(ResolvedRange, VersionSection),
}

/// Builds changelog documents from a version-control backend
pub struct ChangelogBuilder<'a> {
    vcs: &'a dyn VersionControl,
    header: String,
    include_unreleased: bool,
}

impl<'a> ChangelogBuilder<'a> {
    /// Create a builder with the default header
    pub fn new(vcs: &'a dyn VersionControl) -> Self {
        Self {
            vcs,
            header: DEFAULT_HEADER.to_string(),
            include_unreleased: true,
        }
    }

    /// Create a builder honouring the changelog settings
    pub fn from_config(vcs: &'a dyn VersionControl, config: &ChangelogConfig) -> Self {
        let builder = Self::new(vcs).include_unreleased(config.include_unreleased);
        match &config.header {
            Some(header) => builder.with_header(header.clone()),
            None => builder,
        }
    }

    /// Replace the document header
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Whether commits after the newest tag get their own section
    pub fn include_unreleased(mut self, include: bool) -> Self {
        self.include_unreleased = include;
        self
    }

    /// Header placed above the sections
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Build the full document: unreleased commits, then one section per tag.
    ///
    /// Sections appear in tag-list order regardless of which boundaries
    /// could be resolved.
    #[instrument(skip(self))]
    pub fn build_document(&self, today: NaiveDate) -> Result<ChangelogDocument> {
        let tags = self.vcs.list_tags()?;
        info!(tag_count = tags.len(), "building changelog");

        let mut document = ChangelogDocument {
            header: self.header.clone(),
            unreleased: None,
            versions: Vec::with_capacity(tags.len()),
        };

        let Some(newest) = tags.first() else {
            info!("no tags found");
            return Ok(document);
        };

        if self.include_unreleased {
            document.unreleased = self.unreleased_section(newest, today);
        }

        for (i, tag) in tags.iter().enumerate() {
            let date = self.release_date(tag, today);
            let commits = match tags.get(i + 1) {
                Some(previous) => self.commits_or_empty(previous, tag),
                None => self.first_release_commits(tag),
            };
            debug!(tag = %tag, commit_count = commits.len(), "version section");
            document.versions.push(VersionSection::new(tag.as_str(), date, commits));
        }

        Ok(document)
    }

    /// Work out the concrete refs for a single range.
    ///
    /// A version without `from` is compared with the tag before it, or with
    /// the root commit when it is the oldest tag or not a tag at all.
    #[instrument(skip(self))]
    pub fn resolve_range(&self, request: &RangeRequest) -> Result<ResolvedRange> {
        match (&request.version, &request.from) {
            (version, Some(from)) => Ok(ResolvedRange {
                label: version.clone().unwrap_or_else(|| request.to.clone()),
                from: from.clone(),
                to: request.to.clone(),
            }),
            (Some(version), None) => {
                let from = match self.previous_tag(version) {
                    Some(previous) => {
                        info!(version = %version, previous = %previous, "comparing with previous tag");
                        previous
                    }
                    None => {
                        warn!(version = %version, "no previous tag found, using first commit as baseline");
                        self.vcs.first_commit_id()?
                    }
                };
                Ok(ResolvedRange {
                    label: version.clone(),
                    from,
                    to: version.clone(),
                })
            }
            (None, None) => Err(ChangelogError::MissingRange.into()),
        }
    }

    /// Build the section for a single range
    #[instrument(skip(self))]
    pub fn build_range_section(&self, request: &RangeRequest, today: NaiveDate) -> Result<RangeOutcome> {
        let range = self.resolve_range(request)?;
        let commits = self.vcs.commits_between(&range.from, &range.to)?;

        if commits.is_empty() {
            info!(from = %range.from, to = %range.to, "no commits found in range");
            return Ok(RangeOutcome::Empty(range));
        }

        let date = if range.label == self.vcs.head_ref() {
            today
        } else {
            self.release_date(&range.label, today)
        };

        info!(label = %range.label, commit_count = commits.len(), "range section built");
        let section = VersionSection::new(range.label.as_str(), date, commits);
        Ok(RangeOutcome::Section(range, section))
    }

    fn unreleased_section(&self, newest: &str, today: NaiveDate) -> Option<VersionSection> {
        match self.vcs.commits_between(newest, self.vcs.head_ref()) {
            Ok(commits) if commits.is_empty() => None,
            Ok(commits) => Some(VersionSection::new(UNRELEASED_LABEL, today, commits)),
            Err(e) => {
                warn!(tag = %newest, error = %e, "could not read unreleased commits, omitting section");
                None
            }
        }
    }

    fn first_release_commits(&self, tag: &str) -> Vec<CommitRecord> {
        match self.vcs.first_commit_id() {
            Ok(root) => self.commits_or_empty(&root, tag),
            Err(e) => {
                warn!(tag = %tag, error = %e, "could not find first commit, section left empty");
                Vec::new()
            }
        }
    }

    fn commits_or_empty(&self, from: &str, to: &str) -> Vec<CommitRecord> {
        self.vcs.commits_between(from, to).unwrap_or_else(|e| {
            warn!(tag = %to, from = %from, error = %e, "could not read commits, section left empty");
            Vec::new()
        })
    }

    /// Tag date, or `today` when it cannot be determined
    fn release_date(&self, tag: &str, today: NaiveDate) -> NaiveDate {
        match self.vcs.tag_date(tag) {
            Ok(Some(date)) => date,
            Ok(None) => {
                warn!(tag = %tag, "tag not found, dating section today");
                today
            }
            Err(e) => {
                warn!(tag = %tag, error = %e, "could not read tag date, dating section today");
                today
            }
        }
    }

    /// Tag listed directly after `version`
    fn previous_tag(&self, version: &str) -> Option<String> {
        let tags = match self.vcs.list_tags() {
            Ok(tags) => tags,
            Err(e) => {
                warn!(error = %e, "could not list tags");
                return None;
            }
        };

        let position = tags.iter().position(|t| t == version)?;
        tags.get(position + 1).cloned()
    }
}
