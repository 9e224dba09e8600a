//! Commit classification
//!
//! Conventional-commit prefixes are checked first, then a "breaking change"
//! phrase anywhere in the message, then keyword heuristics. Anything left
//! over lands in [`Category::Changed`].

use relnotes_git::CommitRecord;

use crate::types::Category;

/// Subject prefixes, matched case-insensitively at the start of the subject
const PREFIXES: &[(&str, Category)] = &[
    ("feat:", Category::Added),
    ("feature:", Category::Added),
    ("fix:", Category::Fixed),
    ("docs:", Category::Docs),
    ("style:", Category::Changed),
    ("refactor:", Category::Changed),
    ("perf:", Category::Changed),
    ("test:", Category::Tests),
    ("chore:", Category::Chore),
    ("breaking:", Category::Breaking),
    ("remove:", Category::Removed),
    ("delete:", Category::Removed),
    ("deprecate:", Category::Deprecated),
    ("security:", Category::Security),
];

const BREAKING_PHRASE: &str = "breaking change";

/// Matched against subject and body
const SECURITY_KEYWORDS: &[&str] = &["security", "vulnerability", "cve", "exploit"];

/// Matched against the subject only, in this order
const SUBJECT_KEYWORDS: &[(&[&str], Category)] = &[
    (
        &["add", "new", "feature", "implement", "create"],
        Category::Added,
    ),
    (&["fix", "bug", "patch", "resolve", "correct"], Category::Fixed),
    (&["remove", "delete", "drop"], Category::Removed),
    (
        &["update", "improve", "enhance", "optimize", "refactor"],
        Category::Changed,
    ),
];

/// Assign exactly one category to a commit.
///
/// Keywords match as substrings, so "address" counts as "add".
pub fn classify(commit: &CommitRecord) -> Category {
    let subject = commit.subject.to_lowercase();
    let body = commit.body.to_lowercase();

    if let Some(category) = prefix_category(&subject) {
        return category;
    }

    // subject and body are searched separately so no phrase spans the two
    if subject.contains(BREAKING_PHRASE) || body.contains(BREAKING_PHRASE) {
        return Category::Breaking;
    }

    if contains_any(&subject, SECURITY_KEYWORDS) || contains_any(&body, SECURITY_KEYWORDS) {
        return Category::Security;
    }

    SUBJECT_KEYWORDS
        .iter()
        .find(|(keywords, _)| contains_any(&subject, keywords))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Changed)
}

/// Category named by a conventional-commit prefix on a lowercased subject
fn prefix_category(subject: &str) -> Option<Category> {
    PREFIXES
        .iter()
        .find(|(prefix, _)| subject.starts_with(prefix))
        .map(|(_, category)| *category)
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}
