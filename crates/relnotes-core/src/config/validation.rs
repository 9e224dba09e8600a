//! Configuration validation

use regex::Regex;
use tracing::debug;
use url::Url;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_changelog(config)?;
    validate_git(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_changelog(config: &Config) -> Result<()> {
    if config.changelog.file.as_os_str().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "changelog.file".to_string(),
            message: "file cannot be empty".to_string(),
        }
        .into());
    }

    if let Some(repository_url) = &config.changelog.repository_url {
        let parsed = Url::parse(repository_url).map_err(|e| ConfigError::InvalidValue {
            field: "changelog.repository_url".to_string(),
            message: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "changelog.repository_url".to_string(),
                message: "must be an http or https URL".to_string(),
            }
            .into());
        }
    }

    Ok(())
}

fn validate_git(config: &Config) -> Result<()> {
    if config.git.head.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "git.head".to_string(),
            message: "head cannot be empty".to_string(),
        }
        .into());
    }

    if let Some(pattern) = &config.git.tag_pattern {
        Regex::new(pattern).map_err(|e| ConfigError::InvalidValue {
            field: "git.tag_pattern".to_string(),
            message: e.to_string(),
        })?;
    }

    Ok(())
}
