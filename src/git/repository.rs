/*!
 * Git metadata retrieval backed by libgit2
 */

use std::path::Path;

use git2::{DiffFormat, Repository as Git2Repository, Sort};

use super::error::{GitError, GitResult};
use super::MetadataProvider;

/// Metadata provider reading repositories through `git2`
#[derive(Debug, Clone, Copy, Default)]
pub struct Git2Provider;

impl Git2Provider {
    /// Create a new provider
    pub fn new() -> Self {
        Self
    }

    /// Open the repository containing `path`
    fn open(&self, path: &Path) -> GitResult<Git2Repository> {
        Git2Repository::discover(path).map_err(GitError::OpenError)
    }
}

impl MetadataProvider for Git2Provider {
    fn is_repository(&self, path: &Path) -> bool {
        self.open(path).map(|repo| !repo.is_bare()).unwrap_or(false)
    }

    fn staged_diff(&self, path: &Path) -> GitResult<String> {
        let repo = self.open(path)?;

        // An unborn HEAD compares the index against the empty tree
        let head_tree = match repo.head() {
            Ok(head) => Some(head.peel_to_tree().map_err(GitError::DiffError)?),
            Err(_) => None,
        };
        let index = repo.index().map_err(GitError::DiffError)?;
        let diff = repo
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), None)
            .map_err(GitError::DiffError)?;

        let mut patch = String::new();
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            if let origin @ ('+' | '-' | ' ') = line.origin() {
                patch.push(origin);
            }
            patch.push_str(&String::from_utf8_lossy(line.content()));
            true
        })
        .map_err(GitError::DiffError)?;

        Ok(patch)
    }

    fn log(&self, path: &Path, from: &str, to: &str) -> GitResult<String> {
        let repo = self.open(path)?;
        let range = format!("{}..{}", from, to);
        let log_error = |source| GitError::LogError {
            range: range.clone(),
            source,
        };

        let mut revwalk = repo.revwalk().map_err(log_error)?;
        revwalk.set_sorting(Sort::TIME).map_err(log_error)?;
        revwalk.push_range(&range).map_err(log_error)?;

        let mut log = String::new();
        for oid in revwalk {
            let commit = repo.find_commit(oid.map_err(log_error)?).map_err(log_error)?;
            let short_id = commit.as_object().short_id().map_err(log_error)?;
            log.push_str(short_id.as_str().unwrap_or_default());
            log.push(' ');
            log.push_str(commit.summary().unwrap_or_default());
            log.push('\n');
        }

        Ok(log)
    }

    fn current_branch(&self, path: &Path) -> GitResult<String> {
        let repo = self.open(path)?;
        let head = repo.head().map_err(GitError::BranchError)?;

        if repo.head_detached().map_err(GitError::BranchError)? {
            return Ok("HEAD".to_string());
        }

        Ok(head.shorthand().unwrap_or("HEAD").to_string())
    }
}
