//! Tokenizer module for token counting with named BPE encodings
//!
//! The rest of the crate only sees the [`Tokenizer`] trait; encodings are
//! picked once at startup by name through [`create_tokenizer`].

mod error;
mod model;
mod provider;

// Re-exports for public API
pub use error::{TokenizerError, TokenizerResult};
pub use model::Encoding;

use provider::tiktoken::TiktokenProvider;
use provider::Provider;

/// Trait defining the interface for tokenizers
pub trait Tokenizer {
    /// Count tokens in the given text
    fn count_tokens(&self, text: &str) -> TokenizerResult<usize>;

    /// Name of the encoding used for counting
    fn encoding_name(&self) -> String;
}

/// Create a tokenizer for the named encoding
pub fn create_tokenizer(name: &str) -> TokenizerResult<Box<dyn Tokenizer>> {
    let encoding = Encoding::from_name(name)?;
    log::debug!("Loading {} encoding", encoding);

    let provider: Box<dyn Provider> = match encoding {
        Encoding::Cl100kBase | Encoding::P50kBase | Encoding::R50kBase | Encoding::O200kBase => {
            Box::new(TiktokenProvider::new(encoding)?)
        }
    };

    Ok(Box::new(EncodingTokenizer::new(provider, encoding)))
}

/// Tokenizer that delegates counting to a provider for a fixed encoding
pub struct EncodingTokenizer {
    provider: Box<dyn Provider>,
    encoding: Encoding,
}

impl EncodingTokenizer {
    fn new(provider: Box<dyn Provider>, encoding: Encoding) -> Self {
        Self { provider, encoding }
    }
}

impl Tokenizer for EncodingTokenizer {
    fn count_tokens(&self, text: &str) -> TokenizerResult<usize> {
        self.provider.count_tokens(text)
    }

    fn encoding_name(&self) -> String {
        self.encoding.to_string()
    }
}
