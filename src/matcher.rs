/*!
 * Include/exclude pattern matching for scanned paths
 */

use std::path::{Component, Path};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::{Result, TreePromptError};

/// Compiled include and exclude globs
///
/// Both lists are compiled once when the matcher is built, so an invalid
/// pattern fails the run before any file is visited.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    includes: GlobSet,
    excludes: GlobSet,
    has_includes: bool,
}

impl PatternMatcher {
    /// Compile the include and exclude pattern lists
    pub fn new<S: AsRef<str>>(include_patterns: &[S], exclude_patterns: &[S]) -> Result<Self> {
        Ok(Self {
            includes: build_glob_set(include_patterns)?,
            excludes: build_glob_set(exclude_patterns)?,
            has_includes: !include_patterns.is_empty(),
        })
    }

    /// Check whether a path relative to the scan root should be included
    ///
    /// Paths inside a `.git` directory are always rejected, excludes win
    /// over includes, and an empty include list allows everything.
    pub fn is_included(&self, rel_path: &Path) -> bool {
        if is_inside_git_dir(rel_path) {
            return false;
        }

        if self.excludes.is_match(rel_path) {
            return false;
        }

        if !self.has_includes {
            return true;
        }

        self.includes.is_match(rel_path)
    }
}

/// Compile the patterns and check a single path in one call
pub fn should_include<S: AsRef<str>>(
    rel_path: &Path,
    include_patterns: &[S],
    exclude_patterns: &[S],
) -> Result<bool> {
    Ok(PatternMatcher::new(include_patterns, exclude_patterns)?.is_included(rel_path))
}

/// True when any parent component of the path is a `.git` directory
pub fn is_inside_git_dir(rel_path: &Path) -> bool {
    let mut components = rel_path.components().collect::<Vec<_>>();
    components.pop();
    components
        .iter()
        .any(|c| matches!(c, Component::Normal(name) if *name == ".git"))
}

fn build_glob_set<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let glob = Glob::new(pattern).map_err(|source| TreePromptError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| TreePromptError::Pattern {
        pattern: patterns
            .iter()
            .map(|p| p.as_ref())
            .collect::<Vec<_>>()
            .join(","),
        source,
    })
}
