//! Rendering module: reading-order reconstruction and output formats.

mod cleanup;
mod images;
mod json;
mod markdown;
mod options;
mod reconstruct;
mod result;

pub use cleanup::{CleanupOptions, CleanupPipeline, CleanupPreset};
pub use images::{save_images, SavedImage, SkipReason};
pub use json::{to_json, JsonFormat};
pub use markdown::{render_grid, MarkdownRenderer};
pub use options::{ReconstructOptions, DEFAULT_MIN_IMAGE_DIMENSION};
pub use reconstruct::{
    image_placeholder, reconstruct, to_markdown, visual_order,
    DocumentReconstructor, Fragment, ReconstructedText, MERGED_TABLE_MARKER,
};
pub use result::{ReconstructResult, ReconstructStats};
