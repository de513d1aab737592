//! Encoding definitions and name lookup

use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::tokenizer::error::{TokenizerError, TokenizerResult};

/// Supported BPE encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display)]
pub enum Encoding {
    /// GPT-4 and GPT-3.5 encoding
    #[strum(to_string = "cl100k_base", serialize = "cl100k")]
    Cl100kBase,

    /// Codex encoding
    #[strum(to_string = "p50k_base", serialize = "p50k")]
    P50kBase,

    /// GPT-3 encoding
    #[strum(to_string = "r50k_base", serialize = "r50k")]
    R50kBase,

    /// GPT-4o encoding
    #[strum(to_string = "o200k_base", serialize = "o200k")]
    O200kBase,
}

impl Encoding {
    /// Resolve an encoding from its name or short alias
    pub fn from_name(name: &str) -> TokenizerResult<Self> {
        Self::from_str(name.trim()).map_err(|_| TokenizerError::UnsupportedEncoding {
            name: name.to_string(),
            supported: Self::supported_names().join(", "),
        })
    }

    /// Canonical names of every supported encoding
    pub fn supported_names() -> Vec<String> {
        Self::iter().map(|e| e.to_string()).collect()
    }
}
