//! Reconstruction result with statistics.

use super::SavedImage;
use serde::{Deserialize, Serialize};

/// Result of reconstructing a document body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconstructResult {
    /// Final markdown body, without the run header block
    pub content: String,

    /// Outcome per image placeholder, indexed by ordinal
    pub images: Vec<SavedImage>,

    /// Reconstruction statistics
    pub stats: ReconstructStats,
}

impl ReconstructResult {
    /// Create a simple result with just content.
    pub fn content_only(content: String) -> Self {
        let mut stats = ReconstructStats::new();
        stats.count_text(&content);
        Self {
            content,
            images: Vec::new(),
            stats,
        }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Statistics collected during reconstruction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructStats {
    /// Highest page number seen in provenance
    pub page_count: u32,

    /// Items that produced at least one fragment
    pub items_rendered: u32,

    /// HEADER/FOOTER items dropped
    pub furniture_dropped: u32,

    /// Items dropped by the boilerplate list
    pub boilerplate_dropped: u32,

    /// Number of headings rendered
    pub heading_count: u32,

    /// Number of list items rendered
    pub list_item_count: u32,

    /// Number of TABLE items rendered
    pub table_count: u32,

    /// Logical tables built from more than one part
    pub merged_groups: u32,

    /// Image placeholders emitted
    pub image_count: u32,

    /// Images written to disk
    pub images_saved: u32,

    /// Images skipped (noise, missing payload, I/O)
    pub images_skipped: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ReconstructStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ReconstructStats) {
        self.page_count += other.page_count;
        self.items_rendered += other.items_rendered;
        self.furniture_dropped += other.furniture_dropped;
        self.boilerplate_dropped += other.boilerplate_dropped;
        self.heading_count += other.heading_count;
        self.list_item_count += other.list_item_count;
        self.table_count += other.table_count;
        self.merged_groups += other.merged_groups;
        self.image_count += other.image_count;
        self.images_saved += other.images_saved;
        self.images_skipped += other.images_skipped;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}
