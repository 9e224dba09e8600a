//! Version-control queries answered by the `git` executable

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use tracing::{debug, info, instrument};

use relnotes_core::error::GitError;

use crate::repository::Result;
use crate::types::{CommitRecord, DiffStats};
use crate::vcs::VersionControl;

/// Separates fields inside one log record
const FIELD_SEP: char = '\u{1f}';
/// Terminates one log record
const RECORD_SEP: char = '\u{1e}';
/// `git log` format producing `id, date, author, subject, body` records
const LOG_FORMAT: &str = "--pretty=format:%H%x1f%aI%x1f%an%x1f%s%x1f%b%x1e";

/// Repository accessed through the `git` command line
pub struct GitCli {
    root: PathBuf,
    head: String,
    tag_filter: Option<Regex>,
}

impl GitCli {
    /// Use the repository containing `path`
    #[instrument(fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        let git = Self {
            root: path.to_path_buf(),
            head: "HEAD".to_string(),
            tag_filter: None,
        };

        let toplevel = git
            .run("rev-parse", &["rev-parse", "--show-toplevel"])
            .map_err(|_| GitError::NotARepository(path.to_path_buf()))?;

        info!(root = toplevel.trim(), "using git executable");
        Ok(Self {
            root: PathBuf::from(toplevel.trim()),
            ..git
        })
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

    /// Run git with `args`, returning stdout
    fn run(&self, query: &str, args: &[&str]) -> Result<String> {
        debug!(query, ?args, "running git");
        let output = Command::new("git")
            .current_dir(&self.root)
            .args(args)
            .output()
            .map_err(|e| GitError::CommandFailed {
                query: query.to_string(),
                reason: format!("failed to run git: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::CommandFailed {
                query: query.to_string(),
                reason: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VersionControl for GitCli {
    #[instrument(skip(self))]
    fn list_tags(&self) -> Result<Vec<String>> {
        let stdout = self.run("tag", &["tag", "--sort=-version:refname"])?;

        let tags: Vec<String> = stdout
            .lines()
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .filter(|tag| {
                self.tag_filter
                    .as_ref()
                    .map_or(true, |filter| filter.is_match(tag))
            })
            .map(str::to_string)
            .collect();

        debug!(count = tags.len(), "listed tags");
        Ok(tags)
    }

    #[instrument(skip(self))]
    fn commits_between(&self, from: &str, to: &str) -> Result<Vec<CommitRecord>> {
        let range = format!("{}..{}", from, to);
        let stdout = self.run("log", &["log", &range, LOG_FORMAT, "--no-merges"])?;
        let commits = parse_log_output(&stdout)?;
        debug!(count = commits.len(), "collected commits in range");
        Ok(commits)
    }

    fn tag_date(&self, tag: &str) -> Result<Option<NaiveDate>> {
        let target = format!("{}^{{commit}}", tag);
        if self
            .run("rev-parse", &["rev-parse", "--verify", "--quiet", &target])
            .is_err()
        {
            debug!(tag, "tag does not resolve to a commit");
            return Ok(None);
        }

        let stdout = self.run("log", &["log", "-1", "--format=%aI", tag, "--"])?;
        let date = stdout.trim();
        if date.is_empty() {
            return Ok(None);
        }

        let parsed = DateTime::parse_from_rfc3339(date).map_err(|e| {
            GitError::MalformedLogRecord {
                reason: e.to_string(),
                record: date.to_string(),
            }
        })?;
        Ok(Some(parsed.date_naive()))
    }

    fn first_commit_id(&self) -> Result<String> {
        let stdout = self.run("rev-list", &["rev-list", "--max-parents=0", &self.head])?;
        stdout
            .lines()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .last()
            .map(str::to_string)
            .ok_or(GitError::NoCommits)
    }

    fn diff_stats(&self, from: &str, to: &str) -> Result<DiffStats> {
        let stdout = self.run("diff", &["diff", "--shortstat", from, to])?;
        Ok(parse_shortstat(&stdout))
    }

    fn head_ref(&self) -> &str {
        &self.head
    }
}

/// Parse `git log` output produced with the record format used by [`GitCli`].
///
/// A record with fewer than four fields, or with an unparseable date, is an
/// error rather than a commit with shifted fields.
pub fn parse_log_output(output: &str) -> Result<Vec<CommitRecord>> {
    let mut commits = Vec::new();

    for record in output.split(RECORD_SEP) {
        let record = record.trim_start_matches(['\n', '\r']);
        if record.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = record.splitn(5, FIELD_SEP).collect();
        if fields.len() < 4 {
            return Err(GitError::MalformedLogRecord {
                reason: format!("expected at least 4 fields, found {}", fields.len()),
                record: record.to_string(),
            });
        }

        let timestamp =
            DateTime::parse_from_rfc3339(fields[1]).map_err(|e| GitError::MalformedLogRecord {
                reason: format!("invalid date: {}", e),
                record: record.to_string(),
            })?;

        let body = fields.get(4).map_or("", |b| b.trim_end());
        commits.push(CommitRecord::new(fields[0], timestamp, fields[2], fields[3]).with_body(body));
    }

    Ok(commits)
}

/// Parse `git diff --shortstat` output such as
/// ` 5 files changed, 123 insertions(+), 45 deletions(-)`
pub fn parse_shortstat(output: &str) -> DiffStats {
    let mut stats = DiffStats::default();

    for part in output.trim().split(',') {
        let mut words = part.split_whitespace();
        let count = words
            .next()
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(0);
        let kind = words.next().unwrap_or("");

        if kind.starts_with("file") {
            stats.files_changed = count;
        } else if kind.starts_with("insertion") {
            stats.insertions = count;
        } else if kind.starts_with("deletion") {
            stats.deletions = count;
        }
    }

    stats
}
