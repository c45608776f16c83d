//! Image persistence for picture placeholders.

use crate::model::{extension_for, DocumentModel};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::ReconstructOptions;

/// Why an image was not written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Below the minimum dimension (icons, logos, specks)
    TooSmall,
    /// PICTURE item without a payload
    MissingData,
    /// Payload could not be decoded or read
    Decode,
    /// Writing the file failed
    Write,
    /// No image directory was configured
    Disabled,
}

/// Outcome for one image placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SavedImage {
    /// Written; `path` is relative to the run directory
    Saved { path: String },
    /// Not written
    Skipped { reason: SkipReason },
}

impl SavedImage {
    /// Relative path, if the image was written.
    pub fn path(&self) -> Option<&str> {
        match self {
            SavedImage::Saved { path } => Some(path),
            SavedImage::Skipped { .. } => None,
        }
    }

    /// Check if the image was written.
    pub fn is_saved(&self) -> bool {
        matches!(self, SavedImage::Saved { .. })
    }
}

/// Persist the pictures behind each placeholder ordinal.
///
/// `pictures[n]` is the picture index bound to placeholder `n`. Files are
/// named `picture_<n>.<ext>` inside `images_dir`. Failures are recorded per
/// image and never abort the run.
pub fn save_images(
    model: &DocumentModel,
    pictures: &[Option<usize>],
    images_dir: Option<&Path>,
    options: &ReconstructOptions,
) -> Vec<SavedImage> {
    let Some(images_dir) = images_dir else {
        return vec![
            SavedImage::Skipped {
                reason: SkipReason::Disabled
            };
            pictures.len()
        ];
    };

    if !pictures.is_empty() {
        if let Err(e) = fs::create_dir_all(images_dir) {
            log::warn!(
                "Failed to create image directory {}: {}",
                images_dir.display(),
                e
            );
            return vec![
                SavedImage::Skipped {
                    reason: SkipReason::Write
                };
                pictures.len()
            ];
        }
    }

    pictures
        .iter()
        .enumerate()
        .map(|(ordinal, picture)| save_one(model, ordinal, *picture, images_dir, options))
        .collect()
}

fn save_one(
    model: &DocumentModel,
    ordinal: usize,
    picture: Option<usize>,
    images_dir: &Path,
    options: &ReconstructOptions,
) -> SavedImage {
    let skipped = |reason| SavedImage::Skipped { reason };

    let Some(picture) = picture.and_then(|i| model.pictures.get(i)) else {
        log::debug!("Picture {} has no payload", ordinal);
        return skipped(SkipReason::MissingData);
    };
    if picture.uri.is_none() {
        log::debug!("Picture {} has no payload", ordinal);
        return skipped(SkipReason::MissingData);
    }

    if picture.is_below(options.min_image_dimension) {
        log::debug!(
            "Skipping picture {} ({:?}x{:?}): below {} px",
            ordinal,
            picture.width,
            picture.height,
            options.min_image_dimension
        );
        return skipped(SkipReason::TooSmall);
    }

    let data = match picture.load_bytes(model.base_dir.as_deref()) {
        Ok(data) if !data.is_empty() => data,
        Ok(_) => return skipped(SkipReason::MissingData),
        Err(e) => {
            log::warn!("Could not load picture {}: {}", ordinal, e);
            return skipped(SkipReason::Decode);
        }
    };

    let mime = picture.resolved_mime_type(&data);
    let filename = format!("picture_{}.{}", ordinal, extension_for(&mime));
    if let Err(e) = fs::write(images_dir.join(&filename), &data) {
        log::warn!("Could not save picture {}: {}", ordinal, e);
        return skipped(SkipReason::Write);
    }

    log::debug!("Saved {}", filename);
    SavedImage::Saved {
        path: format!("{}{}", options.image_path_prefix, filename),
    }
}
