//! Batch driver over many model files.

use std::path::PathBuf;

use rayon::prelude::*;

use super::{Pipeline, RunOutput};
use crate::error::Result;

/// Result for one input file.
#[derive(Debug)]
pub struct DocumentOutcome {
    /// Input model path
    pub path: PathBuf,

    /// Run output, or the error that stopped this document
    pub result: Result<RunOutput>,
}

impl DocumentOutcome {
    /// Check if the document was processed.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One entry per input file
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchReport {
    /// Number of documents attempted.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Check if no documents were found.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of documents processed.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    /// Outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }
}

/// Process every input, calling `on_done` as each document finishes.
pub(super) fn run<F>(pipeline: &Pipeline, inputs: Vec<PathBuf>, on_done: F) -> BatchReport
where
    F: Fn(&DocumentOutcome) + Sync,
{
    if inputs.is_empty() {
        log::warn!("No supported document models found");
        return BatchReport::default();
    }
    log::info!(
        "Processing {} documents ({})",
        inputs.len(),
        if pipeline.options.parallel {
            "parallel"
        } else {
            "sequential"
        }
    );

    let process = |path: PathBuf| {
        let result = pipeline.process_document(&path);
        if let Err(ref e) = result {
            log::warn!("Failed to process {}: {}", path.display(), e);
        }
        let outcome = DocumentOutcome { path, result };
        on_done(&outcome);
        outcome
    };

    let outcomes: Vec<DocumentOutcome> = if pipeline.options.parallel {
        inputs.into_par_iter().map(process).collect()
    } else {
        inputs.into_iter().map(process).collect()
    };

    BatchReport { outcomes }
}
