/*!
 * Version-control metadata for the prompt
 */

mod error;
mod repository;

// Re-export public items
pub use error::{GitError, GitResult};
pub use repository::Git2Provider;

use std::path::Path;

/// Source of version-control metadata for a directory
pub trait MetadataProvider {
    /// Whether `path` lies inside a version-controlled work tree
    fn is_repository(&self, path: &Path) -> bool;

    /// Changes recorded in the index but not yet committed, as a patch
    fn staged_diff(&self, path: &Path) -> GitResult<String>;

    /// One line per commit reachable from `to` but not from `from`
    fn log(&self, path: &Path, from: &str, to: &str) -> GitResult<String>;

    /// Name of the checked-out branch, `HEAD` when detached
    fn current_branch(&self, path: &Path) -> GitResult<String>;
}
