//! Picture payloads attached to PICTURE items.

use crate::error::{Error, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An extracted picture as reported by the image-extraction collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Picture {
    /// MIME type (e.g., "image/png")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,

    /// Width in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Height in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// `data:` URI or path relative to the model file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl Picture {
    /// Create a picture from raw bytes, embedding them as a data URI.
    pub fn from_bytes(data: &[u8], mimetype: impl Into<String>) -> Self {
        let mimetype = mimetype.into();
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        Self {
            uri: Some(format!("data:{};base64,{}", mimetype, encoded)),
            mimetype: Some(mimetype),
            width: None,
            height: None,
        }
    }

    /// Create a picture pointing at a file next to the model.
    pub fn from_file(path: impl Into<String>) -> Self {
        Self {
            uri: Some(path.into()),
            ..Self::default()
        }
    }

    /// Set pixel dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Whether either known dimension falls below `min_dimension`.
    ///
    /// Pictures without reported dimensions are never considered noise.
    pub fn is_below(&self, min_dimension: u32) -> bool {
        self.width.is_some_and(|w| w < min_dimension)
            || self.height.is_some_and(|h| h < min_dimension)
    }

    /// Load the payload bytes.
    pub fn load_bytes(&self, base_dir: Option<&Path>) -> Result<Vec<u8>> {
        let uri = self
            .uri
            .as_deref()
            .ok_or_else(|| Error::ImageDecode("picture has no payload".into()))?;

        if let Some(rest) = uri.strip_prefix("data:") {
            let (_, payload) = rest
                .split_once(";base64,")
                .ok_or_else(|| Error::ImageDecode("data URI is not base64".into()))?;
            return base64::engine::general_purpose::STANDARD
                .decode(payload.trim())
                .map_err(|e| Error::ImageDecode(e.to_string()));
        }

        let path = match base_dir {
            Some(dir) => dir.join(uri),
            None => Path::new(uri).to_path_buf(),
        };
        Ok(std::fs::read(path)?)
    }

    /// Resolve the MIME type, falling back to the data URI and magic bytes.
    pub fn resolved_mime_type(&self, data: &[u8]) -> String {
        if let Some(ref mime) = self.mimetype {
            return mime.to_ascii_lowercase();
        }
        if let Some(mime) = self
            .uri
            .as_deref()
            .and_then(|u| u.strip_prefix("data:"))
            .and_then(|rest| rest.split(';').next())
            .filter(|m| m.starts_with("image/"))
        {
            return mime.to_ascii_lowercase();
        }
        detect_mime_type(data).unwrap_or("image/png").to_string()
    }
}

/// File extension for an image MIME type.
pub fn extension_for(mime_type: &str) -> &str {
    match mime_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/tiff" => "tiff",
        "image/bmp" => "bmp",
        "image/webp" => "webp",
        // Raw or unrecognized formats
        _ => mime_type
            .strip_prefix("image/")
            .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or("bin"),
    }
}

/// Detect MIME type from data magic bytes.
pub fn detect_mime_type(data: &[u8]) -> Option<&'static str> {
    if data.len() < 8 {
        return None;
    }

    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }

    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }

    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some("image/gif");
    }

    if data.starts_with(&[0x49, 0x49, 0x2A, 0x00]) || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
    {
        return Some("image/tiff");
    }

    if data.starts_with(b"BM") {
        return Some("image/bmp");
    }

    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Some("image/webp");
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_data_uri_roundtrip() {
        let pic = Picture::from_bytes(&PNG_MAGIC, "image/png");
        let bytes = pic.load_bytes(None).unwrap();
        assert_eq!(bytes, PNG_MAGIC);
        assert_eq!(pic.resolved_mime_type(&bytes), "image/png");
    }

    #[test]
    fn test_missing_payload_is_error() {
        let pic = Picture::default();
        assert!(matches!(pic.load_bytes(None), Err(Error::ImageDecode(_))));
    }

    #[test]
    fn test_bad_base64_is_error() {
        let pic = Picture::from_file("data:image/png;base64,@@@");
        assert!(matches!(pic.load_bytes(None), Err(Error::ImageDecode(_))));
    }

    #[test]
    fn test_noise_threshold() {
        let icon = Picture::default().with_dimensions(16, 400);
        assert!(icon.is_below(32));

        let photo = Picture::default().with_dimensions(640, 480);
        assert!(!photo.is_below(32));

        assert!(!Picture::default().is_below(32));
    }

    #[test]
    fn test_detect_mime_type() {
        assert_eq!(detect_mime_type(&PNG_MAGIC), Some("image/png"));
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
        assert_eq!(detect_mime_type(&jpeg), Some("image/jpeg"));
        assert_eq!(detect_mime_type(&[0u8; 4]), None);
    }

    #[test]
    fn test_extension_for() {
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("image/x-icon"), "bin");
        assert_eq!(extension_for("application/octet-stream"), "bin");
    }
}
