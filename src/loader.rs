/*!
 * File content loading and text classification
 */

use std::fs;
use std::path::Path;

use crate::error::{Result, TreePromptError};

/// Extensions whose files are rendered as text, compared case-insensitively
pub const TEXT_EXTENSIONS: &[&str] = &[
    // Plain text & docs
    "txt", "md", "markdown", "rst", "adoc",
    // Source code
    "go", "py", "js", "ts", "jsx", "tsx", "mjs", "cjs", "rs", "c", "h", "cc", "cpp", "hpp",
    "java", "kt", "swift", "rb", "php", "cs", "scala", "lua", "sh", "bash", "zsh", "sql",
    // Markup & styles
    "html", "htm", "xml", "svg", "css", "scss", "sass", "less", "vue", "svelte",
    // Structured data & config
    "json", "yaml", "yml", "toml", "ini", "cfg", "conf", "csv", "proto", "graphql",
];

/// Check whether a file is rendered as text, based purely on its extension
pub fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            TEXT_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Read the content of a file
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
pub fn load(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| TreePromptError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}
