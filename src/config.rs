/*!
 * Configuration handling for treeprompt
 */

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use clap_complete::Shell;

use crate::error::{Result, TreePromptError};
use crate::{bail, ensure};

/// Format of the run report printed after the prompt is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Console tables (default)
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

/// Command-line arguments for treeprompt
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "treeprompt",
    version = env!("CARGO_PKG_VERSION"),
    about = "Assemble a directory tree and its contents into a single LLM prompt",
    long_about = "Walks a directory, selects files by include/exclude globs, and renders a source tree, file contents and optional git metadata through a template into one prompt."
)]
pub struct Args {
    /// Root directory to traverse
    #[clap(long = "dir", default_value = ".")]
    pub root_dir: String,

    /// Comma-separated list of patterns to include (if specified, only matching files are included)
    #[clap(long = "include", value_delimiter = ',')]
    pub include_patterns: Vec<String>,

    /// Comma-separated list of patterns to exclude
    #[clap(long = "exclude", value_delimiter = ',')]
    pub exclude_patterns: Vec<String>,

    /// Output file (default: stdout)
    #[clap(long = "output")]
    pub output_file: Option<String>,

    /// Tokenizer encoding to use (cl100k_base, p50k_base, r50k_base, o200k_base)
    #[clap(long, default_value = "cl100k_base")]
    pub tokenizer: String,

    /// Custom template file
    #[clap(long)]
    pub template: Option<String>,

    /// Include git diff of staged changes
    #[clap(long = "git-diff")]
    pub git_diff: bool,

    /// Include git log between branches
    #[clap(long = "git-log")]
    pub git_log: bool,

    /// First branch for git log (default: current branch)
    #[clap(long)]
    pub branch1: Option<String>,

    /// Second branch for git log
    #[clap(long)]
    pub branch2: Option<String>,

    /// Count tokens per folder and report the heaviest ones
    #[clap(long)]
    pub show_high_token_folders: bool,

    /// Number of folders to show in the high-token report
    #[clap(long, default_value = "10")]
    pub high_token_folder_count: usize,

    /// Format of the run report
    #[clap(long, value_enum, default_value_t = ReportFormat::default())]
    pub report_format: ReportFormat,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[clap(short, long)]
    pub quiet: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Root directory to process
    pub root_dir: PathBuf,

    /// Patterns to include (if empty, include all)
    pub include_patterns: Vec<String>,

    /// Patterns to exclude, checked before includes
    pub exclude_patterns: Vec<String>,

    /// Output file path, `None` writes to stdout
    pub output_file: Option<PathBuf>,

    /// Name of the token encoding
    pub tokenizer: String,

    /// Custom template file overriding the built-in template
    pub template: Option<PathBuf>,

    /// Whether to include the staged diff
    pub include_git_diff: bool,

    /// Whether to include the log between `git_branch1` and `git_branch2`
    pub include_git_log: bool,

    /// First revision for the log (defaults to the current branch)
    pub git_branch1: Option<String>,

    /// Second revision for the log
    pub git_branch2: Option<String>,

    /// Whether to aggregate tokens per folder during the scan
    pub show_high_token_folders: bool,

    /// Number of folders shown in the high-token report
    pub high_token_folder_count: usize,

    /// Format of the run report
    pub report_format: ReportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            output_file: None,
            tokenizer: "cl100k_base".to_string(),
            template: None,
            include_git_diff: false,
            include_git_log: false,
            git_branch1: None,
            git_branch2: None,
            show_high_token_folders: false,
            high_token_folder_count: 10,
            report_format: ReportFormat::default(),
        }
    }
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            root_dir: PathBuf::from(args.root_dir),
            include_patterns: normalize_patterns(args.include_patterns),
            exclude_patterns: normalize_patterns(args.exclude_patterns),
            output_file: non_empty(args.output_file).map(PathBuf::from),
            tokenizer: args.tokenizer,
            template: non_empty(args.template).map(PathBuf::from),
            include_git_diff: args.git_diff,
            include_git_log: args.git_log,
            git_branch1: non_empty(args.branch1),
            git_branch2: non_empty(args.branch2),
            show_high_token_folders: args.show_high_token_folders,
            high_token_folder_count: args.high_token_folder_count,
            report_format: args.report_format,
        }
    }

    /// Whether any git metadata was requested
    pub fn wants_git(&self) -> bool {
        self.include_git_diff || self.include_git_log
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.root_dir.is_dir() {
            return Err(TreePromptError::PathNotFound(format!(
                "Root directory not found: {}",
                self.root_dir.display()
            )));
        }

        // Check if output file directory exists
        if let Some(output) = &self.output_file {
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    bail!(Config, "Output directory not found: {}", parent.display());
                }
            }
        }

        if let Some(template) = &self.template {
            ensure!(
                template.is_file(),
                Config,
                "Template file not found: {}",
                template.display()
            );
        }

        ensure!(
            !self.show_high_token_folders || self.high_token_folder_count > 0,
            Config,
            "High-token folder count must be greater than zero"
        );

        Ok(())
    }
}

/// Trim pattern entries and drop empty ones
pub fn normalize_patterns<I, S>(patterns: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    patterns
        .into_iter()
        .map(|p| p.as_ref().trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
