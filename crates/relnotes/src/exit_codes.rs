//! Exit codes for the CLI

use relnotes_core::error::{ConfigError, GitError};
use relnotes_core::RelnotesError;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// Git error
pub const GIT_ERROR: i32 = 3;

/// Exit code for the first recognised error in the cause chain
pub fn for_error(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(err) = cause.downcast_ref::<RelnotesError>() {
            return match err {
                RelnotesError::Config(_) => CONFIG_ERROR,
                RelnotesError::Git(_) => GIT_ERROR,
                _ => ERROR,
            };
        }
        if cause.is::<ConfigError>() {
            return CONFIG_ERROR;
        }
        if cause.is::<GitError>() {
            return GIT_ERROR;
        }
    }
    ERROR
}

#[cfg(test)]
mod tests {
    use super::*;
    use relnotes_core::error::ChangelogError;

    #[test]
    fn test_git_errors() {
        let err = anyhow::Error::from(RelnotesError::from(GitError::NoCommits));
        assert_eq!(for_error(&err), GIT_ERROR);

        let err = anyhow::Error::from(GitError::RefNotFound("v9".to_string()));
        assert_eq!(for_error(&err), GIT_ERROR);
    }

    #[test]
    fn test_config_errors() {
        let err = anyhow::Error::from(RelnotesError::from(ConfigError::InvalidValue {
            field: "git.head".to_string(),
            message: "must not be empty".to_string(),
        }));
        assert_eq!(for_error(&err), CONFIG_ERROR);
    }

    #[test]
    fn test_context_is_looked_through() {
        let err = anyhow::Error::from(RelnotesError::from(GitError::NoCommits))
            .context("failed to build changelog");
        assert_eq!(for_error(&err), GIT_ERROR);
    }

    #[test]
    fn test_other_errors() {
        let err = anyhow::Error::from(RelnotesError::from(ChangelogError::MissingRange));
        assert_eq!(for_error(&err), ERROR);
        assert_eq!(for_error(&anyhow::anyhow!("boom")), ERROR);
    }
}
