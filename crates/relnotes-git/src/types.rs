//! Git types

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One commit in a ref range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Commit id (full hash)
    pub id: String,
    /// Author timestamp, with the author's offset
    pub timestamp: DateTime<FixedOffset>,
    /// Author display name
    pub author: String,
    /// Summary line
    pub subject: String,
    /// Message body, possibly empty
    pub body: String,
}

impl CommitRecord {
    /// Create a new CommitRecord with an empty body
    pub fn new(
        id: impl Into<String>,
        timestamp: DateTime<FixedOffset>,
        author: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp,
            author: author.into(),
            subject: subject.into(),
            body: String::new(),
        }
    }

    /// Set the commit body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// First 7 characters of the id
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(7) {
            Some((end, _)) => &self.id[..end],
            None => &self.id,
        }
    }
}

/// Line counts between two trees
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    /// Number of files touched
    pub files_changed: usize,
    /// Lines added
    pub insertions: usize,
    /// Lines removed
    pub deletions: usize,
}

/// Information about a git tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagInfo {
    /// Tag name
    pub name: String,
    /// Commit hash the tag points to
    pub commit_hash: String,
    /// Extracted version from tag name
    pub version: Option<String>,
}

impl TagInfo {
    /// Create a new TagInfo
    pub fn new(name: impl Into<String>, commit_hash: impl Into<String>) -> Self {
        let name = name.into();
        let version = extract_version(&name);

        Self {
            name,
            commit_hash: commit_hash.into(),
            version,
        }
    }

    /// Parsed semantic version, when the tag carries one.
    ///
    /// Short versions such as `1.1` or `2024.01` get their missing parts
    /// filled with zeros, so they order alongside full versions.
    pub fn semver(&self) -> Option<semver::Version> {
        self.version.as_deref().and_then(parse_version)
    }
}

/// Parse a version, padding a one- or two-part core to `major.minor.patch`
fn parse_version(version: &str) -> Option<semver::Version> {
    if let Ok(parsed) = semver::Version::parse(version) {
        return Some(parsed);
    }

    let split = version.find(['-', '+']).unwrap_or(version.len());
    let (core, rest) = version.split_at(split);
    let mut parts = core
        .split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;
    if parts.len() > 3 {
        return None;
    }
    parts.resize(3, 0);

    semver::Version::parse(&format!("{}.{}.{}{}", parts[0], parts[1], parts[2], rest)).ok()
}

/// Extract version from a tag name
fn extract_version(tag: &str) -> Option<String> {
    // Handle common tag formats: v1.0.0, 1.0.0, package@1.0.0, package-v1.0.0
    let tag = tag.strip_prefix('v').unwrap_or(tag);

    if let Some(pos) = tag.rfind('@') {
        let version_part = &tag[pos + 1..];
        let version = version_part.strip_prefix('v').unwrap_or(version_part);
        if looks_like_version(version) {
            return Some(version.to_string());
        }
    }

    if let Some(pos) = tag.rfind("-v") {
        let version = &tag[pos + 2..];
        if looks_like_version(version) {
            return Some(version.to_string());
        }
    }

    if looks_like_version(tag) {
        return Some(tag.to_string());
    }

    None
}

/// Check if a string looks like a semantic version
fn looks_like_version(s: &str) -> bool {
    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() < 2 {
        return false;
    }

    parts[0].parse::<u64>().is_ok()
}

/// Order tags newest first by version precedence.
///
/// Tags with a version come first, highest version first; `v1.1` ranks as
/// `1.1.0`. Tags without one follow in descending name order.
pub fn sort_tags_newest_first(tags: &mut [TagInfo]) {
    tags.sort_by(|a, b| match (a.semver(), b.semver()) {
        (Some(va), Some(vb)) => vb.cmp(&va).then_with(|| b.name.cmp(&a.name)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => b.name.cmp(&a.name),
    });
}
