//! Document model types.
//!
//! This module defines the input the engine consumes (layout items, table
//! grids, pictures) and the chunk records it produces. The model is
//! engine-agnostic: any layout/OCR engine that can emit this JSON shape can
//! feed the reconstruction pipeline.

mod chunk;
mod document;
mod item;
mod picture;
mod table;

pub use chunk::{Chunk, ChunkMetadata};
pub use document::{DocumentModel, Origin};
pub use item::{DocumentItem, ItemLabel, Provenance};
pub use picture::{detect_mime_type, extension_for, Picture};
pub use table::Grid;
