//! Release context: a plain summary of what changed between two refs
//!
//! The summary groups commits into broad marketing buckets and carries line
//! statistics. It is meant as input for whoever writes the announcement.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use relnotes_core::error::ChangelogError;
use relnotes_core::Result;
use relnotes_git::{CommitRecord, DiffStats, VersionControl};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::generator::{RangeRequest, ResolvedRange};

const FEATURE_KEYWORDS: &[&str] = &["add", "new", "feature", "implement"];
const FIX_KEYWORDS: &[&str] = &["fix", "bug", "patch", "resolve"];
const IMPROVEMENT_KEYWORDS: &[&str] = &["update", "improve", "enhance", "optimize", "refactor"];
const DOCS_KEYWORDS: &[&str] = &["doc", "readme", "comment"];

/// Commit subject and author as shown in the summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextEntry {
    pub subject: String,
    pub author: String,
}

impl From<&CommitRecord> for ContextEntry {
    fn from(commit: &CommitRecord) -> Self {
        Self {
            subject: commit.subject.clone(),
            author: commit.author.clone(),
        }
    }
}

/// Summary of a release range
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseContext {
    pub version: String,
    pub from: String,
    pub to: String,
    pub date: NaiveDate,
    pub stats: DiffStats,
    pub total_commits: usize,
    pub features: Vec<ContextEntry>,
    pub fixes: Vec<ContextEntry>,
    pub improvements: Vec<ContextEntry>,
    pub docs: Vec<ContextEntry>,
    pub other: Vec<ContextEntry>,
    /// Unique commit authors, sorted
    pub contributors: Vec<String>,
}

impl ReleaseContext {
    /// Group `commits` by subject keywords; first matching bucket wins
    #[instrument(skip(commits, stats), fields(commit_count = commits.len()))]
    pub fn build(
        version: &str,
        from: &str,
        to: &str,
        commits: &[CommitRecord],
        stats: DiffStats,
        today: NaiveDate,
    ) -> Self {
        let mut context = Self {
            version: version.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            date: today,
            stats,
            total_commits: commits.len(),
            features: Vec::new(),
            fixes: Vec::new(),
            improvements: Vec::new(),
            docs: Vec::new(),
            other: Vec::new(),
            contributors: Vec::new(),
        };

        let mut contributors = BTreeSet::new();
        for commit in commits {
            contributors.insert(commit.author.clone());

            let subject = commit.subject.to_lowercase();
            let bucket = if contains_any(&subject, FEATURE_KEYWORDS) {
                &mut context.features
            } else if contains_any(&subject, FIX_KEYWORDS) {
                &mut context.fixes
            } else if contains_any(&subject, IMPROVEMENT_KEYWORDS) {
                &mut context.improvements
            } else if contains_any(&subject, DOCS_KEYWORDS) {
                &mut context.docs
            } else {
                &mut context.other
            };
            bucket.push(ContextEntry::from(commit));
        }
        context.contributors = contributors.into_iter().collect();

        debug!(
            features = context.features.len(),
            fixes = context.fixes.len(),
            improvements = context.improvements.len(),
            contributors = context.contributors.len(),
            "release context built"
        );
        context
    }

    /// Resolve the range, then read commits and statistics from version control.
    ///
    /// Statistics that cannot be read are reported as zero.
    #[instrument(skip(vcs))]
    pub fn collect(vcs: &dyn VersionControl, request: &RangeRequest, today: NaiveDate) -> Result<Self> {
        let range = resolve_context_range(vcs, request)?;
        info!(from = %range.from, to = %range.to, "analyzing changes");

        let commits = vcs.commits_between(&range.from, &range.to)?;
        let stats = vcs.diff_stats(&range.from, &range.to).unwrap_or_else(|e| {
            warn!(error = %e, "could not read diff statistics");
            DiffStats::default()
        });

        Ok(Self::build(&range.label, &range.from, &range.to, &commits, stats, today))
    }

    /// Render the summary as markdown
    pub fn render(&self) -> String {
        let mut output = format!(
            "**Version:** {}\n**From:** {}\n**To:** {}\n**Date:** {}\n\n",
            self.version,
            self.from,
            self.to,
            self.date.format("%Y-%m-%d")
        );

        output.push_str("**Statistics:**\n");
        output.push_str(&format!("- Files changed: {}\n", self.stats.files_changed));
        output.push_str(&format!("- Insertions: +{}\n", self.stats.insertions));
        output.push_str(&format!("- Deletions: -{}\n", self.stats.deletions));
        output.push_str(&format!("- Total commits: {}\n", self.total_commits));

        push_bucket(&mut output, "New Features", &self.features, true);
        push_bucket(&mut output, "Bug Fixes", &self.fixes, true);
        push_bucket(&mut output, "Improvements", &self.improvements, true);
        push_bucket(&mut output, "Documentation", &self.docs, false);
        push_bucket(&mut output, "Other Changes", &self.other, false);

        if !self.contributors.is_empty() {
            output.push_str(&format!("\n**Contributors ({}):**\n", self.contributors.len()));
            for contributor in &self.contributors {
                output.push_str(&format!("- {}\n", contributor));
            }
        }

        output
    }
}

/// Work out the range for a release context.
///
/// A version without `from` is measured from the newest tag up to `to`.
pub fn resolve_context_range(vcs: &dyn VersionControl, request: &RangeRequest) -> Result<ResolvedRange> {
    let from = match (&request.from, &request.version) {
        (Some(from), _) => from.clone(),
        (None, Some(_)) => {
            let newest = vcs.list_tags()?.into_iter().next();
            let newest = newest.ok_or(ChangelogError::NoBaselineTag)?;
            info!(tag = %newest, "using latest tag as baseline");
            newest
        }
        (None, None) => return Err(ChangelogError::MissingRange.into()),
    };

    Ok(ResolvedRange {
        label: request.version.clone().unwrap_or_else(|| request.to.clone()),
        from,
        to: request.to.clone(),
    })
}

fn push_bucket(output: &mut String, title: &str, entries: &[ContextEntry], always: bool) {
    if entries.is_empty() && !always {
        return;
    }
    output.push_str(&format!("\n**{} ({}):**\n", title, entries.len()));
    for entry in entries {
        output.push_str(&format!("- {} (by {})\n", entry.subject, entry.author));
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{commit, day, FakeVcs};
    use relnotes_core::RelnotesError;

    fn by(author: &str, subject: &str) -> CommitRecord {
        let mut record = commit("1234567890", subject);
        record.author = author.to_string();
        record
    }

    fn stats() -> DiffStats {
        DiffStats {
            files_changed: 5,
            insertions: 123,
            deletions: 45,
        }
    }

    #[test]
    fn test_buckets_first_match_wins() {
        let commits = vec![
            by("Ada", "Add export button"),
            by("Grace", "Fix login redirect"),
            by("Ada", "Update dependencies"),
            by("Linus", "Polish readme"),
            by("Grace", "Bump version"),
            by("Ada", "Implement bug tracker"),
        ];
        let context = ReleaseContext::build("v1.2.0", "v1.1.0", "HEAD", &commits, stats(), day(2024, 6, 1));

        assert_eq!(context.features.len(), 2);
        assert_eq!(context.fixes.len(), 1);
        assert_eq!(context.improvements.len(), 1);
        assert_eq!(context.docs.len(), 1);
        assert_eq!(context.other.len(), 1);
        assert_eq!(context.total_commits, 6);
        assert_eq!(context.contributors, vec!["Ada", "Grace", "Linus"]);
    }

    #[test]
    fn test_render_layout() {
        let commits = vec![by("Ada", "Add export button"), by("Grace", "Fix login redirect")];
        let context = ReleaseContext::build("v1.2.0", "v1.1.0", "HEAD", &commits, stats(), day(2024, 6, 1));
        let output = context.render();

        assert!(output.starts_with("**Version:** v1.2.0\n**From:** v1.1.0\n**To:** HEAD\n**Date:** 2024-06-01\n"));
        assert!(output.contains("- Files changed: 5\n- Insertions: +123\n- Deletions: -45\n- Total commits: 2\n"));
        assert!(output.contains("**New Features (1):**\n- Add export button (by Ada)\n"));
        assert!(output.contains("**Bug Fixes (1):**\n- Fix login redirect (by Grace)\n"));
        assert!(output.contains("**Improvements (0):**\n"));
        assert!(!output.contains("Documentation"));
        assert!(!output.contains("Other Changes"));
    }

    #[test]
    fn test_collect_from_latest_tag() {
        let vcs = FakeVcs::new()
            .with_tags(&["v1.1.0", "v1.0.0"])
            .with_range("v1.1.0", "HEAD", vec![commit("aaaaaaaaaa", "Add search")])
            .with_stats(stats());

        let request = RangeRequest::new("HEAD").with_version("v1.2.0");
        let context = ReleaseContext::collect(&vcs, &request, day(2024, 6, 1)).unwrap();

        assert_eq!(context.version, "v1.2.0");
        assert_eq!(context.from, "v1.1.0");
        assert_eq!(context.to, "HEAD");
        assert_eq!(context.features.len(), 1);
        assert_eq!(context.stats, stats());
    }

    #[test]
    fn test_collect_without_stats_uses_zero() {
        let vcs = FakeVcs::new().with_range("v1.0.0", "v1.1.0", vec![commit("aaaaaaaaaa", "Tweak")]);

        let request = RangeRequest::new("v1.1.0").with_from("v1.0.0");
        let context = ReleaseContext::collect(&vcs, &request, day(2024, 6, 1)).unwrap();

        assert_eq!(context.version, "v1.1.0");
        assert_eq!(context.stats, DiffStats::default());
        assert_eq!(context.other.len(), 1);
    }

    #[test]
    fn test_version_without_tags() {
        let vcs = FakeVcs::new();
        let result = resolve_context_range(&vcs, &RangeRequest::new("HEAD").with_version("v1.0.0"));
        assert!(matches!(
            result,
            Err(RelnotesError::Changelog(ChangelogError::NoBaselineTag))
        ));
    }

    #[test]
    fn test_missing_range() {
        let vcs = FakeVcs::new();
        assert!(resolve_context_range(&vcs, &RangeRequest::new("HEAD")).is_err());
    }
}
