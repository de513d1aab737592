//! BPE tokenizer implementation using tiktoken

use tiktoken_rs::CoreBPE;

use super::Provider;
use crate::tokenizer::error::{TokenizerError, TokenizerResult};
use crate::tokenizer::model::Encoding;

/// Tokenizer backed by a tiktoken BPE table
pub struct TiktokenProvider {
    bpe: CoreBPE,
}

impl TiktokenProvider {
    /// Load the BPE table for the given encoding
    pub fn new(encoding: Encoding) -> TokenizerResult<Self> {
        let bpe = match encoding {
            Encoding::Cl100kBase => tiktoken_rs::cl100k_base(),
            Encoding::P50kBase => tiktoken_rs::p50k_base(),
            Encoding::R50kBase => tiktoken_rs::r50k_base(),
            Encoding::O200kBase => tiktoken_rs::o200k_base(),
        }
        .map_err(|e| TokenizerError::LoadError {
            encoding: encoding.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self { bpe })
    }
}

impl Provider for TiktokenProvider {
    fn count_tokens(&self, text: &str) -> TokenizerResult<usize> {
        Ok(self.bpe.encode_ordinary(text).len())
    }
}
