//! Changelog types

use chrono::NaiveDate;
use relnotes_git::CommitRecord;
use serde::{Deserialize, Serialize};

use crate::classifier::classify;

/// Changelog category of a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Incompatible change
    Breaking,
    /// Security fix or hardening
    Security,
    /// New functionality
    Added,
    /// Change to existing functionality
    Changed,
    /// Soon-to-be removed functionality
    Deprecated,
    /// Removed functionality
    Removed,
    /// Bug fix
    Fixed,
    /// Documentation only
    Docs,
    /// Tests only
    Tests,
    /// Maintenance
    Chore,
}

impl Category {
    /// Every category, in rendering priority order
    pub const ALL: [Category; 10] = [
        Self::Breaking,
        Self::Security,
        Self::Added,
        Self::Changed,
        Self::Deprecated,
        Self::Removed,
        Self::Fixed,
        Self::Docs,
        Self::Tests,
        Self::Chore,
    ];

    /// Categories rendered in the changelog, in priority order
    pub const USER_FACING: [Category; 7] = [
        Self::Breaking,
        Self::Security,
        Self::Added,
        Self::Changed,
        Self::Deprecated,
        Self::Removed,
        Self::Fixed,
    ];

    /// Heading title
    pub fn title(&self) -> &'static str {
        match self {
            Self::Breaking => "Breaking Changes",
            Self::Security => "Security",
            Self::Added => "Added",
            Self::Changed => "Changed",
            Self::Deprecated => "Deprecated",
            Self::Removed => "Removed",
            Self::Fixed => "Fixed",
            Self::Docs => "Documentation",
            Self::Tests => "Tests",
            Self::Chore => "Chores",
        }
    }

    /// Heading icon
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Breaking => "⚠️",
            Self::Security => "🔒",
            Self::Added => "✨",
            Self::Changed => "🔄",
            Self::Deprecated => "⚠️",
            Self::Removed => "🗑️",
            Self::Fixed => "🐛",
            Self::Docs => "📝",
            Self::Tests => "🧪",
            Self::Chore => "🔧",
        }
    }

    /// Whether commits in this category appear in the rendered changelog
    pub fn is_user_facing(&self) -> bool {
        Self::USER_FACING.contains(self)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Breaking => "breaking",
            Self::Security => "security",
            Self::Added => "added",
            Self::Changed => "changed",
            Self::Deprecated => "deprecated",
            Self::Removed => "removed",
            Self::Fixed => "fixed",
            Self::Docs => "docs",
            Self::Tests => "tests",
            Self::Chore => "chore",
        };
        f.write_str(name)
    }
}

/// Commits sharing a category, in the order they were fetched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryGroup {
    /// Category of every commit in the group
    pub category: Category,
    /// Commits, newest first
    pub commits: Vec<CommitRecord>,
}

/// The changelog block for one version label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionSection {
    /// Tag name or "Unreleased"
    pub label: String,
    /// Release date
    pub date: NaiveDate,
    /// Non-empty groups in priority order
    pub groups: Vec<CategoryGroup>,
}

impl VersionSection {
    /// Classify `commits` and group them in priority order.
    ///
    /// Categories without commits get no group.
    pub fn new(label: impl Into<String>, date: NaiveDate, commits: Vec<CommitRecord>) -> Self {
        let mut groups: Vec<CategoryGroup> = Category::ALL
            .iter()
            .map(|&category| CategoryGroup {
                category,
                commits: Vec::new(),
            })
            .collect();

        for commit in commits {
            let category = classify(&commit);
            if let Some(group) = groups.iter_mut().find(|g| g.category == category) {
                group.commits.push(commit);
            }
        }

        groups.retain(|g| !g.commits.is_empty());

        Self {
            label: label.into(),
            date,
            groups,
        }
    }

    /// Section with no commits
    pub fn empty(label: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(label, date, Vec::new())
    }

    /// Check if the section has no commits at all
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of commits across all groups
    pub fn commit_count(&self) -> usize {
        self.groups.iter().map(|g| g.commits.len()).sum()
    }

    /// Groups that are rendered, in priority order
    pub fn visible_groups(&self) -> impl Iterator<Item = &CategoryGroup> {
        self.groups.iter().filter(|g| g.category.is_user_facing())
    }
}

/// A full changelog: header, optional unreleased head, versions newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangelogDocument {
    /// Static header text
    pub header: String,
    /// Commits after the newest tag
    pub unreleased: Option<VersionSection>,
    /// One section per tag, newest first
    pub versions: Vec<VersionSection>,
}

impl ChangelogDocument {
    /// Labels of every section, in document order
    pub fn labels(&self) -> Vec<&str> {
        self.unreleased
            .iter()
            .chain(self.versions.iter())
            .map(|s| s.label.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn commit(id: &str, subject: &str) -> CommitRecord {
        CommitRecord::new(
            id,
            DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap(),
            "Test",
            subject,
        )
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_groups_follow_priority_order() {
        let section = VersionSection::new(
            "v1.0.0",
            date(),
            vec![
                commit("a", "fix: crash"),
                commit("b", "feat: search"),
                commit("c", "breaking: drop v1 api"),
                commit("d", "docs: readme"),
            ],
        );

        let order: Vec<_> = section.groups.iter().map(|g| g.category).collect();
        assert_eq!(
            order,
            vec![Category::Breaking, Category::Added, Category::Fixed, Category::Docs]
        );
        assert_eq!(section.commit_count(), 4);
    }

    #[test]
    fn test_group_preserves_commit_order() {
        let section = VersionSection::new(
            "v1.0.0",
            date(),
            vec![commit("a", "feat: one"), commit("b", "feat: two")],
        );
        let ids: Vec<_> = section.groups[0].commits.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_visible_groups_hide_docs_tests_chore() {
        let section = VersionSection::new(
            "v1.0.0",
            date(),
            vec![
                commit("a", "docs: readme"),
                commit("b", "test: cover parser"),
                commit("c", "chore: bump deps"),
            ],
        );
        assert!(!section.is_empty());
        assert_eq!(section.visible_groups().count(), 0);
    }

    #[test]
    fn test_category_display_and_serde_agree() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category));
        }
    }
}
