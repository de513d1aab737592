/*!
 * End-to-end tests for scanning and prompt assembly
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::ProgressBar;
use tempfile::tempdir;

use crate::config::Config;
use crate::error::TreePromptError;
use crate::git::Git2Provider;
use crate::prompt::PromptAssembler;
use crate::scanner::Scanner;
use crate::tokenizer::{Tokenizer, TokenizerResult};
use crate::types::FolderTokenSummary;

/// Counts whitespace-separated words, so expected totals are easy to read
struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn count_tokens(&self, text: &str) -> TokenizerResult<usize> {
        Ok(text.split_whitespace().count())
    }

    fn encoding_name(&self) -> String {
        "words".to_string()
    }
}

fn words(count: usize) -> String {
    vec!["tok"; count].join(" ")
}

// Root with a.go (10 tokens), b.png and sub/c.go (5 tokens)
fn setup_test_directory() -> tempfile::TempDir {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();

    fs::write(root.join("a.go"), words(10)).unwrap();
    fs::write(root.join("b.png"), [0x89, b'P', b'N', b'G', 0, 1, 2]).unwrap();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("sub").join("c.go"), words(5)).unwrap();

    temp_dir
}

fn scanner_for(config: Config) -> Scanner {
    Scanner::new(
        config,
        Arc::new(WordTokenizer),
        Arc::new(ProgressBar::hidden()),
    )
    .unwrap()
}

fn relative(root: &Path, files: &[PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|f| f.strip_prefix(root).unwrap().display().to_string())
        .collect()
}

#[test]
fn test_scan_aggregates_tokens_per_folder() {
    let temp_dir = setup_test_directory();
    let scanner = scanner_for(Config {
        root_dir: temp_dir.path().to_path_buf(),
        show_high_token_folders: true,
        ..Config::default()
    });

    let result = scanner.scan().unwrap();

    assert_eq!(
        result.folders.get(Path::new(".")),
        Some(&FolderTokenSummary {
            path: PathBuf::from("."),
            token_count: 10,
            file_count: 1,
        })
    );
    assert_eq!(
        result.folders.get(Path::new("sub")),
        Some(&FolderTokenSummary {
            path: PathBuf::from("sub"),
            token_count: 5,
            file_count: 1,
        })
    );
    assert_eq!(result.folders.len(), 2);
    assert_eq!(result.statistics.files_included, 3);
}

#[test]
fn test_scan_without_aggregation_leaves_folders_empty() {
    let temp_dir = setup_test_directory();
    let result = scanner_for(Config {
        root_dir: temp_dir.path().to_path_buf(),
        ..Config::default()
    })
    .scan()
    .unwrap();

    assert!(result.folders.is_empty());
    assert_eq!(result.files.len(), 3);
}

#[test]
fn test_exclude_and_include_patterns() {
    let temp_dir = setup_test_directory();
    let root = temp_dir.path();
    let result = scanner_for(Config {
        root_dir: root.to_path_buf(),
        include_patterns: vec!["*.go".to_string()],
        exclude_patterns: vec!["*.png".to_string()],
        ..Config::default()
    })
    .scan()
    .unwrap();

    assert_eq!(relative(root, &result.files), vec!["sub/c.go", "a.go"]);
    assert_eq!(result.statistics.files_excluded, 1);
    assert_eq!(result.statistics.entries_visited, 3);
}

#[test]
fn test_exclude_wins_over_include() {
    let temp_dir = setup_test_directory();
    let root = temp_dir.path();
    let result = scanner_for(Config {
        root_dir: root.to_path_buf(),
        include_patterns: vec!["*.go".to_string()],
        exclude_patterns: vec!["sub/*".to_string()],
        ..Config::default()
    })
    .scan()
    .unwrap();

    assert_eq!(relative(root, &result.files), vec!["a.go"]);
}

#[test]
fn test_scan_is_idempotent() {
    let temp_dir = setup_test_directory();
    let scanner = scanner_for(Config {
        root_dir: temp_dir.path().to_path_buf(),
        show_high_token_folders: true,
        ..Config::default()
    });

    let first = scanner.scan().unwrap();
    let second = scanner.scan().unwrap();

    assert_eq!(first.files, second.files);
    assert_eq!(first.folders, second.folders);
    assert_eq!(first.statistics, second.statistics);
}

#[test]
fn test_folder_totals_sum_to_text_file_tokens() {
    let temp_dir = setup_test_directory();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("sub").join("deep")).unwrap();
    fs::write(root.join("sub").join("deep").join("notes.md"), words(7)).unwrap();
    fs::write(root.join("sub").join("d.rs"), words(3)).unwrap();

    let result = scanner_for(Config {
        root_dir: root.to_path_buf(),
        show_high_token_folders: true,
        ..Config::default()
    })
    .scan()
    .unwrap();

    let folder_total: usize = result.folders.values().map(|f| f.token_count).sum();
    let file_count: usize = result.folders.values().map(|f| f.file_count).sum();
    assert_eq!(folder_total, 10 + 5 + 3 + 7);
    assert_eq!(file_count, 4);
    assert_eq!(result.folders[Path::new("sub")].token_count, 8);
}

#[test]
fn test_git_directory_is_skipped() {
    let temp_dir = setup_test_directory();
    let root = temp_dir.path();
    fs::create_dir_all(root.join(".git").join("objects")).unwrap();
    fs::write(root.join(".git").join("config"), "[core]\n").unwrap();
    fs::write(root.join(".git").join("objects").join("notes.txt"), "x").unwrap();

    let result = scanner_for(Config {
        root_dir: root.to_path_buf(),
        show_high_token_folders: true,
        ..Config::default()
    })
    .scan()
    .unwrap();

    assert!(result
        .files
        .iter()
        .all(|f| !f.components().any(|c| c.as_os_str() == ".git")));
    assert!(result.folders.keys().all(|k| !k.starts_with(".git")));
    assert_eq!(result.statistics.entries_visited, 3);
}

#[test]
fn test_gitlink_file_is_skipped() {
    let temp_dir = setup_test_directory();
    let root = temp_dir.path();
    fs::write(root.join("sub").join(".git"), "gitdir: ../.git/modules/sub\n").unwrap();

    let result = scanner_for(Config {
        root_dir: root.to_path_buf(),
        ..Config::default()
    })
    .scan()
    .unwrap();

    assert_eq!(relative(root, &result.files), vec!["sub/c.go", "a.go", "b.png"]);
    assert_eq!(result.statistics.entries_visited, 3);
}

#[test]
fn test_high_token_folders_ordering() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    for (dir, count) in [("light", 2), ("heavy", 20), ("even_a", 6), ("even_b", 6)] {
        fs::create_dir(root.join(dir)).unwrap();
        fs::write(root.join(dir).join("file.txt"), words(count)).unwrap();
    }

    let result = scanner_for(Config {
        root_dir: root.to_path_buf(),
        show_high_token_folders: true,
        ..Config::default()
    })
    .scan()
    .unwrap();

    let top: Vec<String> = result
        .high_token_folders(3)
        .iter()
        .map(|f| f.path.display().to_string())
        .collect();
    assert_eq!(top, vec!["heavy", "even_a", "even_b"]);
    assert_eq!(result.high_token_folders(10).len(), 4);
}

#[test]
fn test_invalid_pattern_fails_before_scan() {
    let temp_dir = setup_test_directory();
    let result = Scanner::new(
        Config {
            root_dir: temp_dir.path().to_path_buf(),
            include_patterns: vec!["src/[".to_string()],
            ..Config::default()
        },
        Arc::new(WordTokenizer),
        Arc::new(ProgressBar::hidden()),
    );

    match result {
        Err(TreePromptError::Pattern { pattern, .. }) => assert_eq!(pattern, "src/["),
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("invalid pattern was accepted"),
    }
}

#[test]
fn test_unreadable_root_aborts_scan() {
    let temp_dir = tempdir().unwrap();
    let result = scanner_for(Config {
        root_dir: temp_dir.path().join("missing"),
        ..Config::default()
    })
    .scan();

    assert!(matches!(result, Err(TreePromptError::Walk(_))));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_aborts_aggregating_scan() {
    let temp_dir = setup_test_directory();
    let root = temp_dir.path();
    std::os::unix::fs::symlink(root.join("missing.go"), root.join("dangling.go")).unwrap();

    let result = scanner_for(Config {
        root_dir: root.to_path_buf(),
        show_high_token_folders: true,
        ..Config::default()
    })
    .scan();

    match result {
        Err(TreePromptError::Read { path, .. }) => assert!(path.ends_with("dangling.go")),
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("scan succeeded with an unreadable file"),
    }
}

#[test]
fn test_scan_then_assemble_outside_repository() {
    let temp_dir = setup_test_directory();
    let config = Config {
        root_dir: temp_dir.path().to_path_buf(),
        include_git_diff: true,
        ..Config::default()
    };

    let scan_result = scanner_for(config.clone()).scan().unwrap();
    let provider = Git2Provider::new();
    let prompt = PromptAssembler::new(&config, &provider)
        .assemble(&scan_result.files)
        .unwrap();

    assert_eq!(prompt.files_rendered, 2);
    assert_eq!(prompt.warnings.len(), 1);
    assert!(prompt.warnings[0].contains("not a git repository"));
    assert!(prompt.text.contains("--- a.go ---"));
    assert!(prompt.text.contains("--- sub/c.go ---"));
    assert!(!prompt.text.contains("b.png ---"));
    assert!(!prompt.text.contains("Git Diff"));
}

#[test]
fn test_custom_template_renders_only_tree() {
    let temp_dir = setup_test_directory();
    let root = temp_dir.path();
    let template_dir = tempdir().unwrap();
    let template_path = template_dir.path().join("tree.tmpl");
    fs::write(&template_path, "{{.SourceTree}}").unwrap();

    let config = Config {
        root_dir: root.to_path_buf(),
        template: Some(template_path),
        ..Config::default()
    };
    let scan_result = scanner_for(config.clone()).scan().unwrap();
    let provider = Git2Provider::new();
    let prompt = PromptAssembler::new(&config, &provider)
        .assemble(&scan_result.files)
        .unwrap();

    let name = root.file_name().unwrap().to_string_lossy();
    let expected = format!(
        "Source Tree:\n\n```\n{}\n├── sub\n│   └── c.go\n└── a.go\n└── b.png\n```\n",
        name
    );
    assert_eq!(prompt.text, expected);
}
