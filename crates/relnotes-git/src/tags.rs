//! Tag operations

use tracing::{debug, instrument};

use crate::repository::{GitRepo, Result};
use crate::types::{sort_tags_newest_first, TagInfo};

impl GitRepo {
    /// Get all tags, filtered by the configured tag pattern
    #[instrument(skip(self))]
    pub fn tags(&self) -> Result<Vec<TagInfo>> {
        let mut tags = Vec::new();

        self.repo.tag_foreach(|oid, name| {
            let name = String::from_utf8_lossy(name)
                .trim_start_matches("refs/tags/")
                .to_string();

            if self
                .tag_filter
                .as_ref()
                .is_some_and(|filter| !filter.is_match(&name))
            {
                return true;
            }

            if let Ok(commit) = self.repo.find_commit(oid) {
                tags.push(TagInfo::new(&name, commit.id().to_string()));
            } else if let Ok(tag) = self.repo.find_tag(oid) {
                // Annotated tag
                tags.push(TagInfo::new(&name, tag.target_id().to_string()));
            }

            true
        })?;

        debug!(count = tags.len(), "listed tags");
        Ok(tags)
    }

    /// Tags ordered newest first by version precedence
    pub fn sorted_tags(&self) -> Result<Vec<TagInfo>> {
        let mut tags = self.tags()?;
        sort_tags_newest_first(&mut tags);
        Ok(tags)
    }
}
