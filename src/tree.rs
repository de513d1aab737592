/*!
 * Source tree rendering
 */

use std::fs;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::{Result, TreePromptError};
use crate::utils::{dir_display_name, is_git_entry, relative_path, sorted_walk};

const INDENT: &str = "│   ";
const DIR_BRANCH: &str = "├── ";
const FILE_BRANCH: &str = "└── ";

/// Renders an indented view of a directory, honoring its `.gitignore`
pub struct SourceTreeRenderer {
    root: PathBuf,
    ignore: Gitignore,
}

impl SourceTreeRenderer {
    /// Create a renderer for `root`, loading `<root>/.gitignore` if present
    pub fn new(root: &Path) -> Result<Self> {
        Ok(Self {
            root: root.to_path_buf(),
            ignore: load_ignore_rules(root)?,
        })
    }

    /// Check whether a root-relative path is ignored
    pub fn is_ignored(&self, rel_path: &Path, is_dir: bool) -> bool {
        self.ignore.matched(rel_path, is_dir).is_ignore()
    }

    /// Render the tree block
    ///
    /// Ignored directories are skipped with their whole subtree.
    pub fn render(&self) -> Result<String> {
        let mut tree = String::from("Source Tree:\n\n```\n");
        tree.push_str(&dir_display_name(&self.root));
        tree.push('\n');

        let mut walker = sorted_walk(&self.root).into_iter();
        while let Some(entry) = walker.next() {
            let entry = entry?;
            let is_dir = entry.file_type().is_dir();
            let rel_path = relative_path(&self.root, entry.path());

            if is_git_entry(&entry) || self.is_ignored(&rel_path, is_dir) {
                log::trace!("Tree skips {}", rel_path.display());
                if is_dir {
                    walker.skip_current_dir();
                }
                continue;
            }

            let depth = entry.depth().saturating_sub(1);
            tree.push_str(&INDENT.repeat(depth));
            tree.push_str(if is_dir { DIR_BRANCH } else { FILE_BRANCH });
            tree.push_str(&entry.file_name().to_string_lossy());
            tree.push('\n');
        }

        tree.push_str("```\n");
        Ok(tree)
    }
}

/// Build ignore rules from `<root>/.gitignore`, or an empty set without one
fn load_ignore_rules(root: &Path) -> Result<Gitignore> {
    let mut builder = GitignoreBuilder::new(root);
    let path = root.join(".gitignore");

    if path.is_file() {
        let content = fs::read_to_string(&path).map_err(|source| TreePromptError::Read {
            path: path.clone(),
            source,
        })?;

        for line in content.lines() {
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            if let Err(e) = builder.add_line(Some(path.clone()), line) {
                log::warn!("Skipping invalid .gitignore pattern '{}': {}", line, e);
            }
        }
    }

    builder
        .build()
        .map_err(|e| TreePromptError::Config(format!("Failed to build ignore rules: {}", e)))
}
