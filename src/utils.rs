/*!
 * Utility functions for treeprompt
 */

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

/// Canonical sibling order: directories first, then by file name
pub fn compare_entries(a: &DirEntry, b: &DirEntry) -> Ordering {
    b.file_type()
        .is_dir()
        .cmp(&a.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Walker over `root` in canonical order, excluding the root entry itself
pub fn sorted_walk(root: &Path) -> WalkDir {
    WalkDir::new(root).min_depth(1).sort_by(compare_entries)
}

/// True for a `.git` entry, either the repository directory or a gitlink file
pub fn is_git_entry(entry: &DirEntry) -> bool {
    entry.file_name() == ".git"
}

/// Path of `path` relative to `root`, or `path` itself when it lies elsewhere
pub fn relative_path(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Display name of a directory, resolving `.` and `..` to the real name
pub fn dir_display_name(dir: &Path) -> String {
    if let Some(name) = dir.file_name() {
        return name.to_string_lossy().to_string();
    }

    std::fs::canonicalize(dir)
        .ok()
        .and_then(|abs| abs.file_name().map(|n| n.to_string_lossy().to_string()))
        .unwrap_or_else(|| dir.display().to_string())
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
