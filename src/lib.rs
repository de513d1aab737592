/*!
 * treeprompt - Assemble a directory into a single prompt for LLMs
 *
 * This library selects files under a root directory with include/exclude
 * globs, renders a source tree and the selected file contents, optionally
 * adds git metadata, and executes everything through a template.
 */

pub mod config;
pub mod error;
pub mod git;
pub mod loader;
pub mod matcher;
pub mod prompt;
pub mod report;
pub mod scanner;
pub mod template;
pub mod tokenizer;
pub mod tree;
pub mod types;
pub mod utils;
pub mod writer;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use config::{Config, ReportFormat};
pub use error::{Result, TreePromptError};
pub use git::{Git2Provider, MetadataProvider};
pub use matcher::PatternMatcher;
pub use prompt::{Prompt, PromptAssembler, DEFAULT_TEMPLATE};
pub use report::{Reporter, ScanReport};
pub use scanner::{ScanResult, Scanner};
pub use tokenizer::{create_tokenizer, Tokenizer};
pub use tree::SourceTreeRenderer;
pub use types::{FileRecord, FolderTokenSummary};
pub use writer::PromptWriter;
