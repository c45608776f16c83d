//! # docstitch
//!
//! Reassembles the structured output of a layout/OCR engine into clean,
//! reading-order Markdown and splits it into overlap-aware chunks for
//! retrieval.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docstitch::{load_model, render};
//!
//! fn main() -> docstitch::Result<()> {
//!     // Load the engine output
//!     let model = load_model("output.json")?;
//!
//!     // Rebuild the body in visual order
//!     let options = render::ReconstructOptions::default();
//!     let markdown = render::to_markdown(&model, &options);
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Table merging**: tables split across page breaks become one table
//! - **Visual ordering**: items sorted by page and vertical position
//! - **Image re-injection**: pictures saved and linked where they appeared
//! - **Token windows**: chunks with prev/focus/next overlap zones
//! - **Batch runs**: whole folders, optionally in parallel via Rayon
//! - **Cleanup pipeline**: normalization and repeated-letterhead removal

pub mod chunk;
pub mod detect;
pub mod error;
pub mod merge;
pub mod model;
pub mod pipeline;
pub mod render;

// Re-export commonly used types
pub use chunk::{
    chunk_text, CharTokenizer, ChunkOptions, ChunkWindower, Tokenizer, TokenizerKind,
};
pub use detect::{collect_inputs, is_supported_file};
pub use error::{Error, Result};
pub use merge::{merge_tables, MergeStrategy, TableGroup};
pub use model::{
    Chunk, ChunkMetadata, DocumentItem, DocumentModel, Grid, ItemLabel, Origin, Picture,
    Provenance,
};
pub use pipeline::{
    BatchReport, ChunkingStatus, DocumentOutcome, Pipeline, PipelineOptions, RunOutput,
};
pub use render::{
    CleanupOptions, CleanupPreset, DocumentReconstructor, JsonFormat, ReconstructOptions,
    ReconstructResult, ReconstructStats, SavedImage, SkipReason,
};

use std::path::Path;

/// Load a document model from a JSON file.
///
/// # Example
///
/// ```no_run
/// use docstitch::load_model;
///
/// let model = load_model("output.json").unwrap();
/// println!("Items: {}", model.items.len());
/// ```
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<DocumentModel> {
    DocumentModel::from_path(path)
}

/// Parse a document model from JSON text.
pub fn parse_model(json: &str) -> Result<DocumentModel> {
    DocumentModel::from_json(json)
}

/// Load a model file and return its reading-order Markdown body.
///
/// # Example
///
/// ```no_run
/// let markdown = docstitch::to_markdown("output.json").unwrap();
/// std::fs::write("output.md", markdown).unwrap();
/// ```
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let model = load_model(path)?;
    Ok(render::to_markdown(&model, &ReconstructOptions::default()))
}

/// Load a model file and return its chunks with default options.
pub fn to_chunks<P: AsRef<Path>>(path: P) -> Result<Vec<Chunk>> {
    let markdown = to_markdown(path)?;
    chunk_text(&markdown, &ChunkOptions::default())
}

/// Builder for one-off reconstruction and chunking.
///
/// # Example
///
/// ```no_run
/// use docstitch::{CleanupPreset, Docstitch, TokenizerKind};
///
/// let chunks = Docstitch::new()
///     .with_boilerplate("Procura della Repubblica")
///     .with_cleanup(CleanupPreset::Aggressive)
///     .with_chunk_size(1024)
///     .with_tokenizer(TokenizerKind::O200k)
///     .load("output.json")?
///     .to_chunks()?;
/// # Ok::<(), docstitch::Error>(())
/// ```
pub struct Docstitch {
    reconstruct_options: ReconstructOptions,
    chunk_options: ChunkOptions,
}

impl Docstitch {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            reconstruct_options: ReconstructOptions::default(),
            chunk_options: ChunkOptions::default(),
        }
    }

    /// Drop items containing this text.
    pub fn with_boilerplate(mut self, pattern: impl Into<String>) -> Self {
        self.reconstruct_options = self.reconstruct_options.with_boilerplate(pattern);
        self
    }

    /// Set cleanup preset.
    pub fn with_cleanup(mut self, preset: CleanupPreset) -> Self {
        self.reconstruct_options = self.reconstruct_options.with_cleanup_preset(preset);
        self
    }

    /// Disable table merging.
    pub fn without_table_merge(mut self) -> Self {
        self.reconstruct_options = self.reconstruct_options.with_table_merge(false);
        self
    }

    /// Set the chunk size in tokens.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_options = self.chunk_options.with_chunk_size(chunk_size);
        self
    }

    /// Set the overlap in tokens.
    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.chunk_options = self.chunk_options.with_overlap(overlap);
        self
    }

    /// Set the tokenizer.
    pub fn with_tokenizer(mut self, tokenizer: TokenizerKind) -> Self {
        self.chunk_options = self.chunk_options.with_tokenizer(tokenizer);
        self
    }

    /// Load a model file and reconstruct it.
    pub fn load<P: AsRef<Path>>(self, path: P) -> Result<DocstitchResult> {
        let model = load_model(path)?;
        Ok(self.reconstruct(model))
    }

    /// Reconstruct an in-memory model.
    pub fn reconstruct(self, model: DocumentModel) -> DocstitchResult {
        let result = render::reconstruct(&model, &self.reconstruct_options);
        DocstitchResult {
            model,
            result,
            chunk_options: self.chunk_options,
        }
    }
}

impl Default for Docstitch {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of reconstructing a document model.
pub struct DocstitchResult {
    /// The source model
    pub model: DocumentModel,
    /// Reconstructed body and statistics
    pub result: ReconstructResult,
    chunk_options: ChunkOptions,
}

impl DocstitchResult {
    /// Markdown body without the run header.
    pub fn markdown(&self) -> &str {
        &self.result.content
    }

    /// Markdown body with the run header block.
    pub fn markdown_with_header(&self) -> String {
        format!("{}{}", self.model.origin.to_header_block(), self.result.content)
    }

    /// Chunk the body.
    pub fn to_chunks(&self) -> Result<Vec<Chunk>> {
        chunk_text(&self.result.content, &self.chunk_options)
    }

    /// Chunks as pretty JSON.
    pub fn to_chunks_json(&self) -> Result<String> {
        render::to_json(&self.to_chunks()?, JsonFormat::Pretty)
    }

    /// Reconstruction statistics.
    pub fn stats(&self) -> &ReconstructStats {
        &self.result.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = r#"{
        "origin": {"filename": "verbale.pdf", "engine": "tesseract", "ocr_enabled": true},
        "items": [
            {"label": "page_header", "text": "Questura di Genova", "prov": {"page_no": 1, "top_offset": 5}},
            {"label": "text", "text": "Second paragraph.", "prov": {"page_no": 1, "top_offset": 200}},
            {"label": "section_header", "text": "Verbale", "level": 1, "prov": {"page_no": 1, "top_offset": 50}}
        ]
    }"#;

    #[test]
    fn test_builder_defaults() {
        let builder = Docstitch::default();
        assert!(builder.reconstruct_options.merge_tables);
        assert_eq!(builder.chunk_options.chunk_size, 2048);
    }

    #[test]
    fn test_builder_chained() {
        let builder = Docstitch::new()
            .with_boilerplate("Questura")
            .with_cleanup(CleanupPreset::Aggressive)
            .without_table_merge()
            .with_chunk_size(512)
            .with_overlap(64)
            .with_tokenizer(TokenizerKind::Chars);

        assert_eq!(builder.reconstruct_options.boilerplate, vec!["Questura"]);
        assert!(!builder.reconstruct_options.merge_tables);
        assert_eq!(builder.chunk_options.overlap, 64);
        assert_eq!(builder.chunk_options.tokenizer, TokenizerKind::Chars);
    }

    #[test]
    fn test_reconstruct_and_chunk() {
        let model = parse_model(MODEL).unwrap();
        let result = Docstitch::new()
            .with_tokenizer(TokenizerKind::Chars)
            .reconstruct(model);

        assert_eq!(result.markdown(), "# Verbale\n\nSecond paragraph.");
        assert!(result
            .markdown_with_header()
            .starts_with("> Layout engine: **tesseract** (OCR enabled: true)"));

        let chunks = result.to_chunks().unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].focus, "# Verbale\n\nSecond paragraph.");
        assert_eq!(result.stats().furniture_dropped, 1);
    }

    #[test]
    fn test_load_missing_model() {
        assert!(matches!(
            load_model("/no/such/model.json"),
            Err(Error::InputNotFound(_))
        ));
    }

    #[test]
    fn test_parse_invalid_model() {
        assert!(matches!(parse_model("not json"), Err(Error::InvalidModel(_))));
    }
}
