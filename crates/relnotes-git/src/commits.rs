//! Commit history operations

use chrono::{FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use git2::Sort;
use tracing::{debug, instrument};

use relnotes_core::error::GitError;

use crate::repository::{GitRepo, Result};
use crate::types::{CommitRecord, DiffStats};

impl GitRepo {
    /// Commits reachable from `to` but not from `from`, newest first.
    ///
    /// Merge commits are skipped.
    #[instrument(skip(self))]
    pub fn commits_between(&self, from: &str, to: &str) -> Result<Vec<CommitRecord>> {
        let to_oid = self.resolve_commit(to)?;
        let from_oid = self.resolve_commit(from)?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(to_oid)?;
        revwalk.hide(from_oid)?;

        let mut commits = Vec::new();

        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            if commit.parent_count() > 1 {
                continue;
            }
            commits.push(commit_to_record(&commit));
        }

        debug!(count = commits.len(), "collected commits in range");
        Ok(commits)
    }

    /// Id of the oldest root commit reachable from the working head
    #[instrument(skip(self))]
    pub fn first_commit_id(&self) -> Result<String> {
        let head = self.resolve_commit(&self.head)?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head)?;

        let mut root = None;
        for oid in revwalk {
            let oid = oid?;
            if self.repo.find_commit(oid)?.parent_count() == 0 {
                root = Some(oid);
            }
        }

        root.map(|oid| oid.to_string()).ok_or(GitError::NoCommits)
    }

    /// Author date of the commit a ref points to
    pub fn tag_date(&self, tag: &str) -> Result<Option<NaiveDate>> {
        let oid = match self.resolve_commit(tag) {
            Ok(oid) => oid,
            Err(GitError::RefNotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        let commit = self.repo.find_commit(oid)?;
        Ok(Some(author_time(&commit).date_naive()))
    }

    /// Line statistics between the trees of two refs
    #[instrument(skip(self))]
    pub fn diff_stats(&self, from: &str, to: &str) -> Result<DiffStats> {
        let from_tree = self.repo.find_commit(self.resolve_commit(from)?)?.tree()?;
        let to_tree = self.repo.find_commit(self.resolve_commit(to)?)?.tree()?;

        let diff = self
            .repo
            .diff_tree_to_tree(Some(&from_tree), Some(&to_tree), None)?;
        let stats = diff.stats()?;

        Ok(DiffStats {
            files_changed: stats.files_changed(),
            insertions: stats.insertions(),
            deletions: stats.deletions(),
        })
    }
}

fn author_time(commit: &git2::Commit<'_>) -> chrono::DateTime<FixedOffset> {
    let when = commit.author().when();
    let offset = FixedOffset::east_opt(when.offset_minutes() * 60).unwrap_or_else(|| Utc.fix());

    offset
        .timestamp_opt(when.seconds(), 0)
        .single()
        .unwrap_or_else(|| Utc::now().with_timezone(&offset))
}

/// Convert a git2 Commit to a CommitRecord
fn commit_to_record(commit: &git2::Commit<'_>) -> CommitRecord {
    let author = commit.author();

    CommitRecord::new(
        commit.id().to_string(),
        author_time(commit),
        author.name().unwrap_or("Unknown"),
        commit.summary().unwrap_or_default(),
    )
    .with_body(commit.body().unwrap_or_default().trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::VersionControl;
    use git2::{Oid, Repository, Signature, Time};
    use std::path::Path;
    use tempfile::TempDir;

    /// Commit a file change on HEAD with the given message
    fn commit_file(repo: &Repository, dir: &Path, name: &str, content: &str, message: &str) -> Oid {
        std::fs::write(dir.join(name), content).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();

        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = Signature::new("Test", "test@example.com", &Time::new(1_704_103_200, 120))
            .unwrap();
        let parents: Vec<git2::Commit<'_>> = match repo.head() {
            Ok(head) => vec![head.peel_to_commit().unwrap()],
            Err(_) => vec![],
        };
        let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();

        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
    }

    fn setup_repo() -> (TempDir, Vec<Oid>) {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();

        let root = commit_file(&repo, temp.path(), "a.txt", "one\n", "Initial commit");
        let second = commit_file(&repo, temp.path(), "a.txt", "one\ntwo\n", "feat: add search");
        let third = commit_file(
            &repo,
            temp.path(),
            "b.txt",
            "x\n",
            "update deps\n\nThis is a BREAKING CHANGE for downstream consumers\n",
        );

        let commit = repo.find_commit(second).unwrap();
        repo.tag_lightweight("v1.0.0", commit.as_object(), false)
            .unwrap();

        (temp, vec![root, second, third])
    }

    #[test]
    fn test_commits_between_newest_first() {
        let (temp, oids) = setup_repo();
        let repo = GitRepo::open(temp.path()).unwrap();

        let commits = repo.commits_between("v1.0.0", "HEAD").unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].id, oids[2].to_string());
        assert_eq!(commits[0].subject, "update deps");
        assert_eq!(
            commits[0].body,
            "This is a BREAKING CHANGE for downstream consumers"
        );

        let all = repo.commits_between(&oids[0].to_string(), "HEAD").unwrap();
        let subjects: Vec<_> = all.iter().map(|c| c.subject.as_str()).collect();
        assert_eq!(subjects, vec!["update deps", "feat: add search"]);
    }

    #[test]
    fn test_commit_keeps_author_offset() {
        let (temp, _) = setup_repo();
        let repo = GitRepo::open(temp.path()).unwrap();

        let commits = repo.commits_between("v1.0.0", "HEAD").unwrap();
        assert_eq!(commits[0].timestamp.offset().local_minus_utc(), 7200);
        assert_eq!(commits[0].author, "Test");
    }

    #[test]
    fn test_merge_commits_excluded() {
        let (temp, oids) = setup_repo();
        let repo = Repository::open(temp.path()).unwrap();

        let sig = Signature::now("Test", "test@example.com").unwrap();
        let head = repo.head().unwrap().peel_to_commit().unwrap();
        let side = repo.find_commit(oids[1]).unwrap();
        let tree = head.tree().unwrap();
        repo.commit(
            Some("HEAD"),
            &sig,
            &sig,
            "Merge branch 'side'",
            &tree,
            &[&head, &side],
        )
        .unwrap();

        let git_repo = GitRepo::open(temp.path()).unwrap();
        let commits = git_repo.commits_between("v1.0.0", "HEAD").unwrap();
        assert!(commits.iter().all(|c| !c.subject.starts_with("Merge")));
        assert_eq!(commits.len(), 1);
    }

    #[test]
    fn test_first_commit_id() {
        let (temp, oids) = setup_repo();
        let repo = GitRepo::open(temp.path()).unwrap();
        assert_eq!(repo.first_commit_id().unwrap(), oids[0].to_string());
    }

    #[test]
    fn test_first_commit_on_empty_repo() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();
        let repo = GitRepo::open(temp.path()).unwrap();
        assert!(repo.first_commit_id().is_err());
    }

    #[test]
    fn test_tag_date() {
        let (temp, _) = setup_repo();
        let repo = GitRepo::open(temp.path()).unwrap();

        // 2024-01-01T10:00:00Z at +02:00
        assert_eq!(
            repo.tag_date("v1.0.0").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(repo.tag_date("v9.9.9").unwrap(), None);
    }

    #[test]
    fn test_diff_stats() {
        let (temp, _) = setup_repo();
        let repo = GitRepo::open(temp.path()).unwrap();

        let stats = repo.diff_stats("v1.0.0", "HEAD").unwrap();
        assert_eq!(
            stats,
            DiffStats {
                files_changed: 1,
                insertions: 1,
                deletions: 0,
            }
        );
    }

    #[test]
    fn test_trait_dispatch() {
        let (temp, _) = setup_repo();
        let repo = GitRepo::open(temp.path()).unwrap();
        let vcs: &dyn VersionControl = &repo;

        assert_eq!(vcs.list_tags().unwrap(), vec!["v1.0.0".to_string()]);
        assert_eq!(vcs.commits_between("v1.0.0", "HEAD").unwrap().len(), 1);
    }
}
