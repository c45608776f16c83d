//! Reconstruction options and configuration.

use super::{CleanupOptions, CleanupPreset};

/// Default smallest width or height, in pixels, of an image worth keeping.
pub const DEFAULT_MIN_IMAGE_DIMENSION: u32 = 32;

/// Options for rebuilding the reading-order markdown.
#[derive(Debug, Clone)]
pub struct ReconstructOptions {
    /// Text that marks an item as boilerplate (substring match)
    pub boilerplate: Vec<String>,

    /// Prefix for image paths in output (e.g., "images/")
    pub image_path_prefix: String,

    /// Alt text for injected image references
    pub image_alt_text: String,

    /// Images narrower or shorter than this are dropped as icons
    pub min_image_dimension: u32,

    /// Maximum heading level (1-6)
    pub max_heading_level: u8,

    /// Character to use for list markers
    pub list_marker: char,

    /// Merge tables split across page breaks
    pub merge_tables: bool,

    /// Prepend the run header block to `output.md`
    pub include_header: bool,

    /// Text cleanup options
    pub cleanup: Option<CleanupOptions>,
}

impl ReconstructOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a boilerplate string to filter.
    pub fn with_boilerplate(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        if !pattern.trim().is_empty() {
            self.boilerplate.push(pattern);
        }
        self
    }

    /// Replace the boilerplate list.
    pub fn with_boilerplate_list<S: Into<String>>(
        mut self,
        patterns: impl IntoIterator<Item = S>,
    ) -> Self {
        self.boilerplate.clear();
        for p in patterns {
            self = self.with_boilerplate(p);
        }
        self
    }

    /// Set the image path prefix.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_path_prefix = prefix.into();
        self
    }

    /// Set the minimum image dimension.
    pub fn with_min_image_dimension(mut self, pixels: u32) -> Self {
        self.min_image_dimension = pixels;
        self
    }

    /// Set the maximum heading level.
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.max_heading_level = level.clamp(1, 6);
        self
    }

    /// Set the list marker character.
    pub fn with_list_marker(mut self, marker: char) -> Self {
        self.list_marker = marker;
        self
    }

    /// Enable or disable table merging.
    pub fn with_table_merge(mut self, merge: bool) -> Self {
        self.merge_tables = merge;
        self
    }

    /// Enable or disable the run header block.
    pub fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Set cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = Some(cleanup);
        self
    }

    /// Set cleanup preset.
    pub fn with_cleanup_preset(mut self, preset: CleanupPreset) -> Self {
        self.cleanup = Some(CleanupOptions::from_preset(preset));
        self
    }

    /// Disable cleanup entirely.
    pub fn without_cleanup(mut self) -> Self {
        self.cleanup = None;
        self
    }

    /// Whether trimmed item text contains a boilerplate string.
    pub fn is_boilerplate(&self, text: &str) -> bool {
        self.boilerplate.iter().any(|p| text.contains(p.as_str()))
    }
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self {
            boilerplate: Vec::new(),
            image_path_prefix: "images/".to_string(),
            image_alt_text: "Image".to_string(),
            min_image_dimension: DEFAULT_MIN_IMAGE_DIMENSION,
            max_heading_level: 6,
            list_marker: '*',
            merge_tables: true,
            include_header: true,
            cleanup: Some(CleanupOptions::default()),
        }
    }
}
