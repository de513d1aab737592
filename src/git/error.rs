/*!
 * Error types for Git operations
 */

use thiserror::Error;

/// Errors that can occur during Git operations
#[derive(Error, Debug)]
pub enum GitError {
    /// Error opening a Git repository
    #[error("Failed to open repository: {0}")]
    OpenError(git2::Error),

    /// Error computing the staged diff
    #[error("Failed to get staged diff: {0}")]
    DiffError(git2::Error),

    /// Error walking the log between two revisions
    #[error("Failed to get log for {range}: {source}")]
    LogError {
        range: String,
        #[source]
        source: git2::Error,
    },

    /// Error resolving the current branch
    #[error("Failed to get current branch: {0}")]
    BranchError(git2::Error),
}

/// Specialized Result type for Git operations
pub type GitResult<T> = Result<T, GitError>;
