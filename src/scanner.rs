/*!
 * Directory scanning and per-folder token accounting
 */

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::ProgressBar;

use crate::config::Config;
use crate::error::Result;
use crate::loader;
use crate::matcher::PatternMatcher;
use crate::tokenizer::Tokenizer;
use crate::types::FolderTokenSummary;
use crate::utils::{is_git_entry, relative_path, sorted_walk};

/// Scanner statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannerStatistics {
    /// Number of non-directory entries visited
    pub entries_visited: usize,
    /// Number of files that passed the pattern matcher
    pub files_included: usize,
    /// Number of files rejected by the pattern matcher
    pub files_excluded: usize,
}

/// Outcome of a completed scan
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Included file paths in traversal order
    pub files: Vec<PathBuf>,
    /// Token totals keyed by directory, filled only when aggregation is enabled
    pub folders: BTreeMap<PathBuf, FolderTokenSummary>,
    /// Scan statistics
    pub statistics: ScannerStatistics,
}

impl ScanResult {
    /// The `count` folders with the most tokens, heaviest first
    pub fn high_token_folders(&self, count: usize) -> Vec<FolderTokenSummary> {
        let mut folders: Vec<FolderTokenSummary> = self.folders.values().cloned().collect();
        folders.sort_by(|a, b| {
            b.token_count
                .cmp(&a.token_count)
                .then_with(|| a.path.cmp(&b.path))
        });
        folders.truncate(count);
        folders
    }
}

/// Scanner for directory contents
pub struct Scanner {
    /// Scanner configuration
    config: Config,
    /// Compiled include/exclude patterns
    matcher: PatternMatcher,
    /// Token counter used for folder aggregation
    tokenizer: Arc<dyn Tokenizer>,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
}

impl Scanner {
    /// Create a new scanner, compiling the configured patterns
    pub fn new(
        config: Config,
        tokenizer: Arc<dyn Tokenizer>,
        progress: Arc<ProgressBar>,
    ) -> Result<Self> {
        let matcher = PatternMatcher::new(
            config.include_patterns.as_slice(),
            config.exclude_patterns.as_slice(),
        )?;
        Ok(Self {
            config,
            matcher,
            tokenizer,
            progress,
        })
    }

    /// Scan the root directory
    ///
    /// Any traversal or read error aborts the whole scan.
    pub fn scan(&self) -> Result<ScanResult> {
        let root = &self.config.root_dir;
        let aggregate = self.config.show_high_token_folders;
        let mut result = ScanResult::default();

        log::debug!(
            "Scanning {} (folder aggregation: {})",
            root.display(),
            aggregate
        );

        let walker = sorted_walk(root).into_iter().filter_entry(|e| !is_git_entry(e));
        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_dir() {
                continue;
            }

            result.statistics.entries_visited += 1;
            let rel_path = relative_path(root, entry.path());

            if !self.matcher.is_included(&rel_path) {
                log::trace!("Excluded {}", rel_path.display());
                result.statistics.files_excluded += 1;
                continue;
            }

            log::trace!("Included {}", rel_path.display());
            self.progress.inc(1);
            self.progress
                .set_message(format!("Scanning: {}", rel_path.display()));
            result.statistics.files_included += 1;

            if aggregate {
                self.count_file(entry.path(), &rel_path, &mut result.folders)?;
            }

            result.files.push(entry.into_path());
        }

        log::debug!(
            "Scan complete: {} of {} files included",
            result.statistics.files_included,
            result.statistics.entries_visited
        );

        Ok(result)
    }

    /// Add a file's token count to the summary of its parent directory
    fn count_file(
        &self,
        abs_path: &Path,
        rel_path: &Path,
        folders: &mut BTreeMap<PathBuf, FolderTokenSummary>,
    ) -> Result<()> {
        if !loader::is_text_file(rel_path) {
            return Ok(());
        }

        let content = loader::load(abs_path)?;
        let tokens = self.tokenizer.count_tokens(&content)?;

        let folder = match rel_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        folders
            .entry(folder.clone())
            .or_insert_with(|| FolderTokenSummary::new(folder))
            .add_file(tokens);

        Ok(())
    }
}
