//! Changelog file writer

use std::path::Path;

use tracing::{debug, info};

use crate::error::{ChangelogError, Result};

/// Write a rendered document, replacing any existing file.
///
/// Parent directories are created as needed.
pub fn write_changelog(path: &Path, content: &str) -> Result<()> {
    info!(path = %path.display(), bytes = content.len(), "writing changelog");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ChangelogError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    }

    std::fs::write(path, content).map_err(|e| ChangelogError::WriteFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(())
}

/// Read existing changelog content
pub fn read_changelog(path: &Path) -> Result<Option<String>> {
    if path.exists() {
        debug!(path = %path.display(), "reading existing changelog");
        Ok(Some(std::fs::read_to_string(path).map_err(ChangelogError::Io)?))
    } else {
        debug!(path = %path.display(), "no existing changelog found");
        Ok(None)
    }
}
