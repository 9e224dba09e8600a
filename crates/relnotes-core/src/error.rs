//! Error types for relnotes

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using RelnotesError
pub type Result<T> = std::result::Result<T, RelnotesError>;

/// Main error type for relnotes operations
#[derive(Debug, Error)]
pub enum RelnotesError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Version-control errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Changelog-related errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Version-control errors.
///
/// Every variant means a required query could not be answered. Callers that
/// can degrade (a single tag date, a single range) catch these locally; the
/// rest propagate to the user as a hard stop.
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found
    #[error("Git repository not found at {0}")]
    RepositoryNotFound(PathBuf),

    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// No commits found
    #[error("No commits found in repository")]
    NoCommits,

    /// A ref (tag, branch or commit) could not be resolved
    #[error("Reference not found: {0}")]
    RefNotFound(String),

    /// The git executable failed for a query
    #[error("git {query} failed: {reason}")]
    CommandFailed { query: String, reason: String },

    /// A log record did not have the expected shape
    #[error("Malformed log record ({reason}): {record:?}")]
    MalformedLogRecord { reason: String, record: String },

    /// Tag filter pattern is not a valid regular expression
    #[error("Invalid tag pattern: {0}")]
    InvalidTagPattern(String),

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Changelog-related errors
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// Neither a version nor a starting ref was given for a single range
    #[error("Either --all, --version, or --from must be specified")]
    MissingRange,

    /// A version was given without `--from` and no tag exists to start from
    #[error("No previous tags found; specify --from")]
    NoBaselineTag,

    /// Failed to write changelog
    #[error("Failed to write changelog to {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
