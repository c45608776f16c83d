//! Token-windowed chunking with prev/focus/next overlap zones.

mod splitter;
mod tokenizer;
mod windower;

pub use splitter::{RecursiveSplitter, DEFAULT_SEPARATORS};
pub use tokenizer::{BpeTokenizer, CharTokenizer, Tokenizer, TokenizerKind};
pub use windower::ChunkWindower;

use crate::error::{Error, Result};
use crate::model::Chunk;

/// Default chunk size in tokens.
pub const DEFAULT_CHUNK_SIZE: usize = 2048;

/// Default overlap in tokens.
pub const DEFAULT_OVERLAP: usize = 200;

/// Default `metadata.source` label.
pub const DEFAULT_SOURCE: &str = "docstitch";

/// Options for chunking.
#[derive(Debug, Clone)]
pub struct ChunkOptions {
    /// Maximum tokens per chunk
    pub chunk_size: usize,

    /// Tokens shared between neighbouring chunks
    pub overlap: usize,

    /// Label written to each chunk's metadata
    pub source: String,

    /// Tokenizer used to measure and cut chunks
    pub tokenizer: TokenizerKind,
}

impl ChunkOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chunk size in tokens.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the overlap in tokens.
    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.overlap = overlap;
        self
    }

    /// Set the metadata source label.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Set the tokenizer.
    pub fn with_tokenizer(mut self, tokenizer: TokenizerKind) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Check that the chunk size is positive and exceeds the overlap.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk size must be positive".into()));
        }
        if self.overlap >= self.chunk_size {
            return Err(Error::InvalidConfig(format!(
                "overlap ({}) must be smaller than chunk size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
            source: DEFAULT_SOURCE.to_string(),
            tokenizer: TokenizerKind::default(),
        }
    }
}

/// Chunk a body, loading the configured tokenizer.
pub fn chunk_text(text: &str, options: &ChunkOptions) -> Result<Vec<Chunk>> {
    let tokenizer = options.tokenizer.load()?;
    let windower = ChunkWindower::new(tokenizer, options.clone())?;
    Ok(windower.chunk(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ChunkOptions::default();
        assert_eq!(options.chunk_size, 2048);
        assert_eq!(options.overlap, 200);
        assert_eq!(options.source, "docstitch");
        assert_eq!(options.tokenizer, TokenizerKind::Cl100k);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(ChunkOptions::new().with_chunk_size(0).validate().is_err());
        assert!(ChunkOptions::new()
            .with_chunk_size(10)
            .with_overlap(10)
            .validate()
            .is_err());
        assert!(ChunkOptions::new()
            .with_chunk_size(10)
            .with_overlap(0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_chunk_text_with_chars() {
        let options = ChunkOptions::new().with_tokenizer(TokenizerKind::Chars);
        let chunks = chunk_text("Hello there.", &options).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text(), "Hello there.");
    }
}
