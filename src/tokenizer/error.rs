//! Error types for the tokenizer module

use thiserror::Error;

/// Result type for tokenizer operations
pub type TokenizerResult<T> = Result<T, TokenizerError>;

/// Errors that can occur during tokenization
#[derive(Error, Debug)]
pub enum TokenizerError {
    /// Encoding name is not supported
    #[error("Unsupported encoding: {name} (supported: {supported})")]
    UnsupportedEncoding { name: String, supported: String },

    /// Error from the BPE library while loading an encoding
    #[error("Failed to load encoding {encoding}: {message}")]
    LoadError { encoding: String, message: String },
}
