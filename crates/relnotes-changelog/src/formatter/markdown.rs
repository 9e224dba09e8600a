//! Markdown changelog formatter

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use relnotes_git::CommitRecord;
use tracing::{debug, instrument};

use super::ChangelogFormatter;
use crate::types::{ChangelogDocument, VersionSection};

/// Keep a Changelog boilerplate placed above the first section
pub const DEFAULT_HEADER: &str = "# Changelog

All notable changes to this project will be documented in this file.

The format is based on [Keep a Changelog](https://keepachangelog.com/en/1.0.0/),
and this project adheres to [Semantic Versioning](https://semver.org/spec/v2.0.0.html).";

/// Conventional prefixes removed from entry text
static PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(feat|fix|docs|style|refactor|perf|test|chore|security|breaking|remove|deprecate):\s*",
    )
    .expect("Invalid regex")
});

/// Markdown changelog formatter
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormatter {
    /// Base of commit links; entries link to `<base>/<full id>`
    pub commit_url_base: Option<String>,
}

impl MarkdownFormatter {
    /// Create a new markdown formatter that prints bare short hashes
    pub fn new() -> Self {
        Self::default()
    }

    /// Link entries to commits under `base`, e.g. `https://github.com/o/r/commit`
    pub fn with_commit_url_base(mut self, base: impl Into<String>) -> Self {
        self.commit_url_base = Some(base.into());
        self
    }

    /// One bullet's text: prefix stripped, first letter capitalised, hash appended
    pub fn format_entry(&self, commit: &CommitRecord) -> String {
        let text = PREFIX_REGEX.replace(&commit.subject, "");
        let text = capitalize_first(&text);
        let short = commit.short_id();

        match &self.commit_url_base {
            Some(base) => format!("{} ([{}]({}/{}))", text, short, base, commit.id),
            None => format!("{} ({})", text, short),
        }
    }

    /// Classify `commits` and render them as one section
    pub fn render_section(&self, label: &str, date: NaiveDate, commits: Vec<CommitRecord>) -> String {
        self.format_section(&VersionSection::new(label, date, commits))
    }

    /// Header followed by a single section
    pub fn wrap_with_header(&self, header: &str, section: &str) -> String {
        format!("{}\n\n{}\n", header.trim_end(), section)
    }
}

impl ChangelogFormatter for MarkdownFormatter {
    #[instrument(skip(self, section), fields(label = %section.label, commit_count = section.commit_count()))]
    fn format_section(&self, section: &VersionSection) -> String {
        let mut output = format!("## [{}] - {}\n\n", section.label, section.date.format("%Y-%m-%d"));

        if section.is_empty() {
            output.push_str("No changes recorded.\n\n");
            return output;
        }

        for group in section.visible_groups() {
            output.push_str(&format!("### {} {}\n\n", group.category.icon(), group.category.title()));
            for commit in &group.commits {
                output.push_str(&format!("- {}\n", self.format_entry(commit)));
            }
            output.push('\n');
        }

        debug!(output_len = output.len(), "section formatted");
        output
    }

    #[instrument(skip_all, fields(sections = document.labels().len()))]
    fn format_document(&self, document: &ChangelogDocument) -> String {
        let mut output = format!("{}\n\n", document.header.trim_end());

        if document.unreleased.is_none() && document.versions.is_empty() {
            output.push_str("## [Unreleased]\n\nNo unreleased changes.\n\n");
            return output;
        }

        for section in document.unreleased.iter().chain(document.versions.iter()) {
            output.push_str(&self.format_section(section));
        }

        debug!(output_len = output.len(), "changelog formatted");
        output
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    const BASE: &str = "https://github.com/acme/site/commit";

    fn commit(id: &str, subject: &str) -> CommitRecord {
        CommitRecord::new(
            id,
            DateTime::parse_from_rfc3339("2024-05-01T10:00:00+02:00").unwrap(),
            "Test",
            subject,
        )
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn formatter() -> MarkdownFormatter {
        MarkdownFormatter::new().with_commit_url_base(BASE)
    }

    #[test]
    fn test_format_entry_strips_prefix_and_links() {
        let entry = formatter().format_entry(&commit("abcdef1234567890", "feat: add search"));
        assert_eq!(
            entry,
            format!("Add search ([abcdef1]({}/abcdef1234567890))", BASE)
        );
    }

    #[test]
    fn test_format_entry_without_prefix() {
        let entry = formatter().format_entry(&commit("abcdef1234567890", "Ship new dashboard"));
        assert_eq!(
            entry,
            format!("Ship new dashboard ([abcdef1]({}/abcdef1234567890))", BASE)
        );
    }

    #[test]
    fn test_format_entry_prefix_case_and_spacing() {
        let f = formatter();
        assert!(f
            .format_entry(&commit("1234567890", "FIX:   off-by-one"))
            .starts_with("Off-by-one ("));
        // only the listed prefixes are stripped
        assert!(f
            .format_entry(&commit("1234567890", "feature: dark mode"))
            .starts_with("Feature: dark mode ("));
    }

    #[test]
    fn test_format_entry_empty_subject() {
        let entry = formatter().format_entry(&commit("1234567890", "chore:"));
        assert_eq!(entry, format!(" ([1234567]({}/1234567890))", BASE));
    }

    #[test]
    fn test_format_entry_without_repository_url() {
        let entry = MarkdownFormatter::new().format_entry(&commit("abcdef1234567890", "fix: crash"));
        assert_eq!(entry, "Crash (abcdef1)");
    }

    #[test]
    fn test_render_empty_section() {
        let output = formatter().render_section("v1.0.0", date(), Vec::new());
        assert_eq!(output, "## [v1.0.0] - 2024-05-01\n\nNo changes recorded.\n\n");

        let output = formatter().render_section(
            "v1.0.1",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Vec::new(),
        );
        assert!(output.contains("No changes recorded."));
        assert!(!output.contains("###"));
    }

    #[test]
    fn test_render_section_priority_order() {
        let output = formatter().render_section(
            "v2.0.0",
            date(),
            vec![
                commit("1111111111", "fix: crash on start"),
                commit("2222222222", "feat: add search"),
                commit("3333333333", "breaking: drop v1 api"),
            ],
        );

        let breaking = output.find("### ⚠️ Breaking Changes").unwrap();
        let added = output.find("### ✨ Added").unwrap();
        let fixed = output.find("### 🐛 Fixed").unwrap();
        assert!(breaking < added && added < fixed);
        assert!(output.starts_with("## [v2.0.0] - 2024-05-01\n\n"));
        assert!(output.contains(&format!("- Crash on start ([1111111]({}/1111111111))\n", BASE)));
    }

    #[test]
    fn test_render_section_exact_layout() {
        let output = MarkdownFormatter::new().render_section(
            "v1.1.0",
            date(),
            vec![commit("aaaaaaaaaa", "feat: one"), commit("bbbbbbbbbb", "feat: two")],
        );
        assert_eq!(
            output,
            "## [v1.1.0] - 2024-05-01\n\n### ✨ Added\n\n- One (aaaaaaa)\n- Two (bbbbbbb)\n\n"
        );
    }

    #[test]
    fn test_hidden_categories_render_heading_only() {
        let output = formatter().render_section(
            "v1.0.1",
            date(),
            vec![
                commit("1111111111", "docs: readme"),
                commit("2222222222", "chore: bump deps"),
            ],
        );
        assert_eq!(output, "## [v1.0.1] - 2024-05-01\n\n");
        assert!(!output.contains("###"));
    }

    #[test]
    fn test_document_without_sections() {
        let document = ChangelogDocument {
            header: DEFAULT_HEADER.to_string(),
            unreleased: None,
            versions: Vec::new(),
        };
        let output = formatter().format_document(&document);
        assert!(output.starts_with("# Changelog\n\nAll notable changes"));
        assert!(output.ends_with(
            "Semantic Versioning](https://semver.org/spec/v2.0.0.html).\n\n## [Unreleased]\n\nNo unreleased changes.\n\n"
        ));
    }

    #[test]
    fn test_document_section_order() {
        let document = ChangelogDocument {
            header: DEFAULT_HEADER.to_string(),
            unreleased: Some(VersionSection::new(
                "Unreleased",
                date(),
                vec![commit("9999999999", "feat: next")],
            )),
            versions: vec![
                VersionSection::new("v2.0.0", date(), vec![commit("2222222222", "feat: b")]),
                VersionSection::empty("v1.0.0", date()),
            ],
        };

        let output = formatter().format_document(&document);
        let unreleased = output.find("## [Unreleased]").unwrap();
        let v2 = output.find("## [v2.0.0]").unwrap();
        let v1 = output.find("## [v1.0.0]").unwrap();
        assert!(unreleased < v2 && v2 < v1);
        assert!(output.ends_with("## [v1.0.0] - 2024-05-01\n\nNo changes recorded.\n\n"));
    }

    #[test]
    fn test_custom_header_gets_blank_line() {
        let document = ChangelogDocument {
            header: "# Release history\n".to_string(),
            unreleased: None,
            versions: vec![VersionSection::empty("v1.0.0", date())],
        };
        let output = formatter().format_document(&document);
        assert!(output.starts_with("# Release history\n\n## [v1.0.0]"));
    }

    #[test]
    fn test_wrap_with_header() {
        let f = formatter();
        let section = f.render_section("v1.0.0", date(), Vec::new());
        let output = f.wrap_with_header(DEFAULT_HEADER, &section);
        assert!(output.starts_with("# Changelog\n\n"));
        assert!(output.ends_with("No changes recorded.\n\n\n"));
    }

    #[test]
    fn test_extension() {
        assert_eq!(MarkdownFormatter::new().extension(), "md");
    }
}
