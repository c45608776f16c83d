//! Chunk records written to `chunks.json`.

use serde::{Deserialize, Serialize};

/// One overlap-aware chunk of the reconstructed body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Sequence position, starting at 0
    pub id: usize,

    /// Leading overlap shared with the previous chunk
    pub prev: String,

    /// Content unique to this chunk
    pub focus: String,

    /// Trailing overlap shared with the next chunk
    pub next: String,

    /// Provenance
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Full text of the chunk, zones joined by a space.
    pub fn text(&self) -> String {
        [self.prev.as_str(), self.focus.as_str(), self.next.as_str()]
            .iter()
            .filter(|z| !z.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether the chunk carries overlap on either side.
    pub fn has_overlap(&self) -> bool {
        !self.prev.is_empty() || !self.next.is_empty()
    }
}

/// Chunk provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Label of the producing pipeline
    pub source: String,

    /// Character count of the whole chunk before zone decomposition
    pub chunk_size_chars: usize,
}
