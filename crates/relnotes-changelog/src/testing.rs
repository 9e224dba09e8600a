//! In-memory version control for builder tests

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate};
use relnotes_core::error::GitError;
use relnotes_git::{CommitRecord, DiffStats, Result, VersionControl};

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn commit(id: &str, subject: &str) -> CommitRecord {
    CommitRecord::new(
        id,
        DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap(),
        "Test Author",
        subject,
    )
}

fn unavailable(query: &str) -> GitError {
    GitError::CommandFailed {
        query: query.to_string(),
        reason: "simulated failure".to_string(),
    }
}

#[derive(Default)]
pub struct FakeVcs {
    tags: Vec<String>,
    tags_fail: bool,
    ranges: HashMap<(String, String), Vec<CommitRecord>>,
    failing_ranges: HashSet<(String, String)>,
    dates: HashMap<String, NaiveDate>,
    failing_dates: HashSet<String>,
    root: Option<String>,
    stats: Option<DiffStats>,
}

impl FakeVcs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_failing_tags(mut self) -> Self {
        self.tags_fail = true;
        self
    }

    pub fn with_range(mut self, from: &str, to: &str, commits: Vec<CommitRecord>) -> Self {
        self.ranges.insert((from.to_string(), to.to_string()), commits);
        self
    }

    pub fn with_failing_range(mut self, from: &str, to: &str) -> Self {
        self.failing_ranges.insert((from.to_string(), to.to_string()));
        self
    }

    pub fn with_date(mut self, tag: &str, date: NaiveDate) -> Self {
        self.dates.insert(tag.to_string(), date);
        self
    }

    pub fn without_date(mut self, tag: &str) -> Self {
        self.dates.remove(tag);
        self
    }

    pub fn with_failing_date(mut self, tag: &str) -> Self {
        self.failing_dates.insert(tag.to_string());
        self
    }

    pub fn with_root(mut self, id: &str) -> Self {
        self.root = Some(id.to_string());
        self
    }

    pub fn without_root(mut self) -> Self {
        self.root = None;
        self
    }

    pub fn with_stats(mut self, stats: DiffStats) -> Self {
        self.stats = Some(stats);
        self
    }
}

impl VersionControl for FakeVcs {
    fn list_tags(&self) -> Result<Vec<String>> {
        if self.tags_fail {
            return Err(unavailable("tag"));
        }
        Ok(self.tags.clone())
    }

    fn commits_between(&self, from: &str, to: &str) -> Result<Vec<CommitRecord>> {
        let key = (from.to_string(), to.to_string());
        if self.failing_ranges.contains(&key) {
            return Err(unavailable("log"));
        }
        Ok(self.ranges.get(&key).cloned().unwrap_or_default())
    }

    fn tag_date(&self, tag: &str) -> Result<Option<NaiveDate>> {
        if self.failing_dates.contains(tag) {
            return Err(unavailable("log"));
        }
        Ok(self.dates.get(tag).copied())
    }

    fn first_commit_id(&self) -> Result<String> {
        self.root.clone().ok_or(GitError::NoCommits)
    }

    fn diff_stats(&self, _from: &str, _to: &str) -> Result<DiffStats> {
        self.stats.ok_or_else(|| unavailable("diff"))
    }

    fn head_ref(&self) -> &str {
        "HEAD"
    }
}
