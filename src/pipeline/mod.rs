//! Run pipeline: one document model in, one run directory of artifacts out.
//!
//! # Example
//!
//! ```no_run
//! use docstitch::pipeline::{Pipeline, PipelineOptions};
//!
//! fn main() -> docstitch::Result<()> {
//!     let pipeline = Pipeline::new(PipelineOptions::new().with_output_dir("runs"))?;
//!     let report = pipeline.process_batch("models/")?;
//!     println!("{} of {} documents processed", report.succeeded(), report.len());
//!     Ok(())
//! }
//! ```

mod batch;
mod run_dir;

pub use batch::{BatchReport, DocumentOutcome};
pub use run_dir::{create_run_dir, run_dir_name, RUN_TIMESTAMP_FORMAT};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::chunk::{ChunkOptions, ChunkWindower, Tokenizer};
use crate::error::{Error, Result};
use crate::model::DocumentModel;
use crate::render::{
    to_json, DocumentReconstructor, JsonFormat, ReconstructOptions, ReconstructStats, SavedImage,
};

/// Body markdown with the run header block.
pub const MARKDOWN_FILE: &str = "output.md";
/// Pretty JSON array of chunks.
pub const CHUNKS_FILE: &str = "chunks.json";
/// Pretty copy of the input model.
pub const MODEL_FILE: &str = "output.json";

/// Options for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Root under which run directories are created
    pub output_dir: PathBuf,

    /// Process batch documents on the rayon pool
    pub parallel: bool,

    /// Write `output.json` next to the other artifacts
    pub write_model_copy: bool,

    /// Reconstruction options
    pub reconstruct: ReconstructOptions,

    /// Chunking options
    pub chunk: ChunkOptions,
}

impl PipelineOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output root.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Enable or disable parallel batch processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enable or disable the model copy.
    pub fn with_model_copy(mut self, write: bool) -> Self {
        self.write_model_copy = write;
        self
    }

    /// Set reconstruction options.
    pub fn with_reconstruct_options(mut self, options: ReconstructOptions) -> Self {
        self.reconstruct = options;
        self
    }

    /// Set chunking options.
    pub fn with_chunk_options(mut self, options: ChunkOptions) -> Self {
        self.chunk = options;
        self
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            parallel: false,
            write_model_copy: true,
            reconstruct: ReconstructOptions::default(),
            chunk: ChunkOptions::default(),
        }
    }
}

/// Outcome of the chunking stage of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChunkingStatus {
    /// Chunks were written
    Completed { chunks: usize },
    /// The tokenizer was unavailable; no chunks were written
    Failed { reason: String },
}

impl ChunkingStatus {
    /// Check if chunking completed.
    pub fn is_completed(&self) -> bool {
        matches!(self, ChunkingStatus::Completed { .. })
    }
}

/// Artifacts and statistics of one run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Fresh directory holding the artifacts
    pub run_dir: PathBuf,

    /// Path of `output.md`
    pub markdown_path: PathBuf,

    /// Path of `chunks.json`, when chunking completed
    pub chunks_path: Option<PathBuf>,

    /// Outcome per image placeholder
    pub images: Vec<SavedImage>,

    /// Reconstruction statistics
    pub stats: ReconstructStats,

    /// Chunking outcome
    pub chunking: ChunkingStatus,
}

/// Runs documents through reconstruction and chunking.
///
/// The tokenizer is loaded once and shared by every document.
pub struct Pipeline {
    options: PipelineOptions,
    tokenizer: std::result::Result<Arc<dyn Tokenizer>, String>,
}

impl Pipeline {
    /// Create a pipeline, loading the configured tokenizer.
    ///
    /// A tokenizer that fails to load does not fail the pipeline: every run
    /// reports [`ChunkingStatus::Failed`] instead.
    pub fn new(options: PipelineOptions) -> Result<Self> {
        let tokenizer = options.chunk.tokenizer.load();
        Self::with_loaded(options, tokenizer)
    }

    /// Create a pipeline around an already loaded tokenizer.
    pub fn with_tokenizer(options: PipelineOptions, tokenizer: Arc<dyn Tokenizer>) -> Result<Self> {
        Self::with_loaded(options, Ok(tokenizer))
    }

    /// Create a pipeline from the outcome of a tokenizer load.
    pub fn with_loaded(
        options: PipelineOptions,
        tokenizer: Result<Arc<dyn Tokenizer>>,
    ) -> Result<Self> {
        options.chunk.validate()?;
        let tokenizer = tokenizer.map_err(|e| {
            log::warn!("Chunking disabled: {}", e);
            e.to_string()
        });
        Ok(Self { options, tokenizer })
    }

    /// The options in use.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Load a model file and process it.
    pub fn process_document<P: AsRef<Path>>(&self, path: P) -> Result<RunOutput> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::InputNotFound(path.to_path_buf()));
        }
        let model = DocumentModel::from_path(path)?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.process_model(&model, &stem)
    }

    /// Process an in-memory model into a fresh run directory named after `stem`.
    pub fn process_model(&self, model: &DocumentModel, stem: &str) -> Result<RunOutput> {
        let started = chrono::Local::now();
        let run_dir = create_run_dir(&self.options.output_dir, stem, &started)?;
        log::info!("Processing {} into {}", stem, run_dir.display());

        let reconstruct = &self.options.reconstruct;
        let images_dir = match reconstruct.image_path_prefix.trim_end_matches('/') {
            "" => run_dir.clone(),
            prefix => run_dir.join(prefix),
        };
        let result = DocumentReconstructor::new(reconstruct.clone())
            .reconstruct(model, Some(&images_dir));

        let markdown_path = run_dir.join(MARKDOWN_FILE);
        let mut markdown = String::new();
        if reconstruct.include_header {
            markdown.push_str(&model.origin.to_header_block());
        }
        markdown.push_str(&result.content);
        fs::write(&markdown_path, &markdown)?;

        let (chunking, chunks_path) = match &self.tokenizer {
            Ok(tokenizer) => {
                let windower = ChunkWindower::new(tokenizer.clone(), self.options.chunk.clone())?;
                let chunks = windower.chunk(&result.content);
                let chunks_path = run_dir.join(CHUNKS_FILE);
                fs::write(&chunks_path, to_json(&chunks, JsonFormat::Pretty)?)?;
                (
                    ChunkingStatus::Completed {
                        chunks: chunks.len(),
                    },
                    Some(chunks_path),
                )
            }
            Err(reason) => {
                log::warn!("Skipping chunking for {}: {}", stem, reason);
                (
                    ChunkingStatus::Failed {
                        reason: reason.clone(),
                    },
                    None,
                )
            }
        };

        if self.options.write_model_copy {
            fs::write(run_dir.join(MODEL_FILE), to_json(model, JsonFormat::Pretty)?)?;
        }

        log::info!(
            "Finished {}: {} words, {} images saved, {:?}",
            stem,
            result.stats.word_count,
            result.stats.images_saved,
            chunking
        );

        Ok(RunOutput {
            run_dir,
            markdown_path,
            chunks_path,
            images: result.images,
            stats: result.stats,
            chunking,
        })
    }

    /// Process a single model file or every model file in a directory.
    ///
    /// Per-document failures are recorded and do not stop the batch.
    pub fn process_batch<P: AsRef<Path>>(&self, input: P) -> Result<BatchReport> {
        let inputs = crate::detect::collect_inputs(input)?;
        Ok(self.process_paths(inputs))
    }

    /// Process already resolved model files.
    pub fn process_paths(&self, inputs: Vec<PathBuf>) -> BatchReport {
        batch::run(self, inputs, |_| {})
    }

    /// Process already resolved model files, reporting each finished document.
    ///
    /// With `parallel` set, `on_done` is called from rayon worker threads.
    pub fn process_paths_with<F>(&self, inputs: Vec<PathBuf>, on_done: F) -> BatchReport
    where
        F: Fn(&DocumentOutcome) + Sync,
    {
        batch::run(self, inputs, on_done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::CharTokenizer;
    use crate::model::DocumentItem;

    fn pipeline(root: &Path) -> Pipeline {
        let options = PipelineOptions::new().with_output_dir(root);
        Pipeline::with_tokenizer(options, Arc::new(CharTokenizer)).unwrap()
    }

    #[test]
    fn test_options_builder() {
        let options = PipelineOptions::new()
            .with_output_dir("runs")
            .with_parallel(true)
            .with_model_copy(false);
        assert_eq!(options.output_dir, PathBuf::from("runs"));
        assert!(options.parallel);
        assert!(!options.write_model_copy);
    }

    #[test]
    fn test_invalid_chunk_options() {
        let options = PipelineOptions::new()
            .with_chunk_options(ChunkOptions::new().with_chunk_size(10).with_overlap(20));
        assert!(matches!(
            Pipeline::with_tokenizer(options, Arc::new(CharTokenizer)),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_process_model_writes_artifacts() {
        let root = tempfile::tempdir().unwrap();
        let mut model = DocumentModel::new();
        model.origin.filename = Some("memo.pdf".into());
        model.add_item(DocumentItem::heading("Memo", 1).at(1, 0.0));
        model.add_item(DocumentItem::text("Body text.").at(1, 10.0));

        let output = pipeline(root.path()).process_model(&model, "memo").unwrap();

        let markdown = fs::read_to_string(&output.markdown_path).unwrap();
        assert!(markdown.starts_with("> Layout engine: **unknown** (OCR enabled: false)"));
        assert!(markdown.ends_with("# Memo\n\nBody text."));
        assert_eq!(output.chunking, ChunkingStatus::Completed { chunks: 1 });

        let chunks = fs::read_to_string(output.chunks_path.unwrap()).unwrap();
        assert!(chunks.contains("\"focus\": \"# Memo\\n\\nBody text.\""));
        assert!(!chunks.contains("Layout engine"));
        assert!(output.run_dir.join(MODEL_FILE).exists());
    }

    #[test]
    fn test_missing_input() {
        let root = tempfile::tempdir().unwrap();
        let err = pipeline(root.path())
            .process_document(root.path().join("absent.json"))
            .unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));
    }
}
