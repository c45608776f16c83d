//! Tokenizers used to measure and cut chunks.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tiktoken_rs::CoreBPE;

use crate::error::{Error, Result};

/// Encodes text to token ids and back.
///
/// Implementations are shared across worker threads during batch runs.
pub trait Tokenizer: Send + Sync {
    /// Encode text to token ids.
    fn encode(&self, text: &str) -> Vec<u32>;

    /// Decode token ids to text.
    fn decode(&self, tokens: &[u32]) -> Result<String>;

    /// Number of tokens in `text`.
    fn count(&self, text: &str) -> usize {
        self.encode(text).len()
    }

    /// Encoding name, for logs.
    fn name(&self) -> &str;
}

/// Byte-pair encoding backed by `tiktoken-rs`.
pub struct BpeTokenizer {
    name: &'static str,
    bpe: CoreBPE,
}

impl BpeTokenizer {
    /// The `cl100k_base` encoding.
    pub fn cl100k() -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| Error::TokenizerLoad(e.to_string()))?;
        Ok(Self {
            name: "cl100k_base",
            bpe,
        })
    }

    /// The `o200k_base` encoding.
    pub fn o200k() -> Result<Self> {
        let bpe = tiktoken_rs::o200k_base().map_err(|e| Error::TokenizerLoad(e.to_string()))?;
        Ok(Self {
            name: "o200k_base",
            bpe,
        })
    }
}

impl Tokenizer for BpeTokenizer {
    fn encode(&self, text: &str) -> Vec<u32> {
        self.bpe
            .encode_with_special_tokens(text)
            .into_iter()
            .map(|t| t as u32)
            .collect()
    }

    fn decode(&self, tokens: &[u32]) -> Result<String> {
        self.bpe
            .decode(tokens.iter().map(|&t| t as _).collect())
            .map_err(|e| Error::Tokenizer(e.to_string()))
    }

    fn name(&self) -> &str {
        self.name
    }
}

impl fmt::Debug for BpeTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BpeTokenizer").field("name", &self.name).finish()
    }
}

/// One token per Unicode scalar value. Needs no vocabulary.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharTokenizer;

impl Tokenizer for CharTokenizer {
    fn encode(&self, text: &str) -> Vec<u32> {
        text.chars().map(u32::from).collect()
    }

    fn decode(&self, tokens: &[u32]) -> Result<String> {
        tokens
            .iter()
            .map(|&t| {
                char::from_u32(t)
                    .ok_or_else(|| Error::Tokenizer(format!("invalid scalar value {:#x}", t)))
            })
            .collect()
    }

    fn count(&self, text: &str) -> usize {
        text.chars().count()
    }

    fn name(&self) -> &str {
        "chars"
    }
}

/// Tokenizer selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenizerKind {
    /// tiktoken `cl100k_base`
    #[default]
    Cl100k,
    /// tiktoken `o200k_base`
    O200k,
    /// Unicode scalar values
    Chars,
}

impl TokenizerKind {
    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenizerKind::Cl100k => "cl100k_base",
            TokenizerKind::O200k => "o200k_base",
            TokenizerKind::Chars => "chars",
        }
    }

    /// Load the tokenizer.
    pub fn load(&self) -> Result<Arc<dyn Tokenizer>> {
        log::debug!("Loading tokenizer {}", self.as_str());
        Ok(match self {
            TokenizerKind::Cl100k => Arc::new(BpeTokenizer::cl100k()?),
            TokenizerKind::O200k => Arc::new(BpeTokenizer::o200k()?),
            TokenizerKind::Chars => Arc::new(CharTokenizer),
        })
    }
}

impl FromStr for TokenizerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cl100k_base" | "cl100k" => Ok(TokenizerKind::Cl100k),
            "o200k_base" | "o200k" => Ok(TokenizerKind::O200k),
            "chars" | "char" => Ok(TokenizerKind::Chars),
            other => Err(Error::InvalidConfig(format!("unknown tokenizer '{}'", other))),
        }
    }
}

impl fmt::Display for TokenizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_tokenizer() {
        let tok = CharTokenizer;
        let ids = tok.encode("città");
        assert_eq!(ids.len(), 5);
        assert_eq!(tok.decode(&ids).unwrap(), "città");
        assert_eq!(tok.count("città"), 5);
        assert!(tok.decode(&[0xD800]).is_err());
    }

    #[test]
    fn test_cl100k_roundtrip() {
        let tok = TokenizerKind::Cl100k.load().unwrap();
        let ids = tok.encode("hello world");
        assert_eq!(ids.len(), 2);
        assert_eq!(tok.decode(&ids).unwrap(), "hello world");
        assert_eq!(tok.name(), "cl100k_base");
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("o200k_base".parse::<TokenizerKind>().unwrap(), TokenizerKind::O200k);
        assert_eq!("CHARS".parse::<TokenizerKind>().unwrap(), TokenizerKind::Chars);
        assert!("gpt2".parse::<TokenizerKind>().is_err());
    }
}
