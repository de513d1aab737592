/*!
 * Core types and data structures for the treeprompt application
 */

use std::path::PathBuf;

use serde::Serialize;

/// A selected text file ready for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path relative to the scan root
    pub relative_path: String,
    /// Raw file content
    pub content: String,
}

/// Token totals for the files directly inside one directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderTokenSummary {
    /// Directory path relative to the scan root (`.` for the root)
    pub path: PathBuf,
    /// Sum of token counts of the directory's included text files
    pub token_count: usize,
    /// Number of files counted
    pub file_count: usize,
}

impl FolderTokenSummary {
    /// Create an empty summary for a directory
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            token_count: 0,
            file_count: 0,
        }
    }

    /// Account for one more file
    pub fn add_file(&mut self, tokens: usize) {
        self.token_count += tokens;
        self.file_count += 1;
    }
}
