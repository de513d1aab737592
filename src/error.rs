//! Global error handling for treeprompt
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project. Every variant is fatal to a run.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::git::GitError;
use crate::template::TemplateError;
use crate::tokenizer::TokenizerError;

/// Global error type for treeprompt operations
#[derive(Error, Debug)]
pub enum TreePromptError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A glob pattern that failed to compile
    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// Tokenizer-related errors
    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),

    /// Git-related errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// Template compilation or execution errors
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Directory traversal errors
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// A file that could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failure writing the rendered prompt
    #[error("Failed to write prompt to {target}: {source}")]
    Write {
        target: String,
        #[source]
        source: io::Error,
    },

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(String),
}

/// Specialized Result type for treeprompt operations
pub type Result<T> = std::result::Result<T, TreePromptError>;

/// Creates a TreePromptError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::TreePromptError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_positive(n: usize) -> Result<usize> {
        crate::ensure!(n > 0, Config, "count must be positive, got {}", n);
        Ok(n)
    }

    #[test]
    fn test_ensure_macro() {
        assert_eq!(check_positive(3).unwrap(), 3);

        let err = check_positive(0).unwrap_err();
        assert!(matches!(err, TreePromptError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: count must be positive, got 0"
        );
    }

    #[test]
    fn test_read_error_names_path() {
        let err = TreePromptError::Read {
            path: PathBuf::from("src/missing.rs"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("src/missing.rs"));
    }
}
