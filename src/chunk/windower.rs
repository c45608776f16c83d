//! Overlap-aware chunk decomposition.

use std::sync::Arc;

use crate::error::Result;
use crate::model::{Chunk, ChunkMetadata};

use super::{ChunkOptions, RecursiveSplitter, Tokenizer};

/// Splits a body into chunks and cuts each into prev/focus/next zones.
pub struct ChunkWindower {
    tokenizer: Arc<dyn Tokenizer>,
    options: ChunkOptions,
}

impl ChunkWindower {
    /// Create a windower. Fails when the options are inconsistent.
    pub fn new(tokenizer: Arc<dyn Tokenizer>, options: ChunkOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { tokenizer, options })
    }

    /// The options in use.
    pub fn options(&self) -> &ChunkOptions {
        &self.options
    }

    /// Split `text` into trimmed pieces of at most `chunk_size` tokens.
    pub fn split(&self, text: &str) -> Vec<String> {
        RecursiveSplitter::new(
            self.tokenizer.as_ref(),
            self.options.chunk_size,
            self.options.overlap,
        )
        .split(text)
    }

    /// Produce chunks for `text`. Empty text yields no chunks.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let pieces = self.split(text);
        let last = pieces.len().saturating_sub(1);

        let chunks: Vec<Chunk> = pieces
            .iter()
            .enumerate()
            .map(|(id, piece)| self.decompose(id, piece, id == 0, id == last))
            .collect();

        log::debug!(
            "Split {} chars into {} chunks ({} tokens, overlap {}, {})",
            text.len(),
            chunks.len(),
            self.options.chunk_size,
            self.options.overlap,
            self.tokenizer.name()
        );
        chunks
    }

    fn decompose(&self, id: usize, piece: &str, first: bool, last: bool) -> Chunk {
        let metadata = ChunkMetadata {
            source: self.options.source.clone(),
            chunk_size_chars: piece.chars().count(),
        };
        let whole = |metadata| Chunk {
            id,
            prev: String::new(),
            focus: piece.to_string(),
            next: String::new(),
            metadata,
        };

        let tokens = self.tokenizer.encode(piece);
        let overlap = self.options.overlap;
        let n = tokens.len();
        if n <= 2 * overlap || (first && last) {
            return whole(metadata);
        }

        let focus_start = if first { 0 } else { overlap };
        let focus_end = if last { n } else { n - overlap };

        let prev = self.decode_zone(id, "prev", &tokens[..focus_start]);
        let focus = self.decode_zone(id, "focus", &tokens[focus_start..focus_end]);
        let next = self.decode_zone(id, "next", &tokens[focus_end..]);

        if focus.is_empty() {
            log::debug!("Chunk {} has an empty focus zone; keeping it whole", id);
            return whole(metadata);
        }

        Chunk {
            id,
            prev,
            focus,
            next,
            metadata,
        }
    }

    fn decode_zone(&self, id: usize, zone: &str, tokens: &[u32]) -> String {
        if tokens.is_empty() {
            return String::new();
        }
        match self.tokenizer.decode(tokens) {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                log::warn!("Chunk {}: could not decode {} zone: {}", id, zone, e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::CharTokenizer;

    fn windower(chunk_size: usize, overlap: usize) -> ChunkWindower {
        let options = ChunkOptions::new()
            .with_chunk_size(chunk_size)
            .with_overlap(overlap);
        ChunkWindower::new(Arc::new(CharTokenizer), options).unwrap()
    }

    #[test]
    fn test_short_input_single_focus() {
        let chunks = windower(2048, 200).chunk("A short paragraph.");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].focus, "A short paragraph.");
        assert!(chunks[0].prev.is_empty());
        assert!(chunks[0].next.is_empty());
        assert_eq!(chunks[0].metadata.chunk_size_chars, 18);
        assert_eq!(chunks[0].metadata.source, "docstitch");
    }

    #[test]
    fn test_single_long_chunk_has_no_overlap() {
        let text = "word ".repeat(100);
        let chunks = windower(2048, 20).chunk(&text);
        assert_eq!(chunks.len(), 1);
        assert!(!chunks[0].has_overlap());
        assert_eq!(chunks[0].focus, text.trim());
    }

    #[test]
    fn test_zones_for_two_chunks() {
        let text = "para-0001\n\npara-0002\n\npara-0003\n\npara-0004";
        let chunks = windower(25, 4).chunk(text);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].prev, "");
        assert_eq!(chunks[0].focus, "para-0001\n\npara-");
        assert_eq!(chunks[0].next, "0002");
        assert_eq!(chunks[1].prev, "para");
        assert_eq!(chunks[1].focus, "-0003\n\npara-0004");
        assert_eq!(chunks[1].next, "");
        assert_eq!(chunks[1].id, 1);
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(windower(100, 10).chunk("   ").is_empty());
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = ChunkOptions::new().with_chunk_size(100).with_overlap(100);
        assert!(ChunkWindower::new(Arc::new(CharTokenizer), options).is_err());
    }
}
