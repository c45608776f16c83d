//! Reading-order reconstruction of a document model.
//!
//! A pass runs in four steps:
//!
//! 1. order items visually by `(page_no, top_offset)`, items without
//!    provenance last;
//! 2. drop page furniture and boilerplate, render the rest to fragments;
//! 3. splice merged tables into the fragments of their member tables;
//! 4. resolve image fragments to links and assemble the body.
//!
//! Fragments keep the table index or image ordinal they came from, so the
//! splice and the image resolution never depend on searching rendered text.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::path::Path;

use crate::merge::{merge_tables, TableGroup};
use crate::model::{DocumentItem, DocumentModel, ItemLabel};

use super::{
    render_grid, save_images, CleanupPipeline, MarkdownRenderer, ReconstructOptions,
    ReconstructResult, ReconstructStats, SavedImage,
};

/// Replaces every non-leading part of a merged table.
pub const MERGED_TABLE_MARKER: &str = "<!-- merged table part -->";

/// Placeholder token for the image with the given ordinal.
pub fn image_placeholder(ordinal: usize) -> String {
    format!("<!-- image:{} -->", ordinal)
}

/// A piece of the reconstructed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Plain rendered markdown
    Markdown(String),
    /// Rendering of a table, bound to its table index
    Table { index: usize, markdown: String },
    /// Image placeholder, bound to its ordinal in this pass
    Image { ordinal: usize },
}

impl Fragment {
    /// Markdown text of the fragment.
    pub fn as_markdown(&self) -> Cow<'_, str> {
        match self {
            Fragment::Markdown(text) => Cow::Borrowed(text),
            Fragment::Table { markdown, .. } => Cow::Borrowed(markdown),
            Fragment::Image { ordinal } => Cow::Owned(image_placeholder(*ordinal)),
        }
    }
}

/// Fragments of one reconstruction pass, before image resolution.
#[derive(Debug, Clone, Default)]
pub struct ReconstructedText {
    fragments: Vec<Fragment>,
    /// Picture index behind each placeholder ordinal
    pictures: Vec<Option<usize>>,
}

impl ReconstructedText {
    /// Fragments in reading order.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Picture index bound to each placeholder, by ordinal.
    pub fn pictures(&self) -> &[Option<usize>] {
        &self.pictures
    }

    /// Number of image placeholders.
    pub fn image_count(&self) -> usize {
        self.pictures.len()
    }

    fn push(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    fn push_image(&mut self, picture: Option<usize>) {
        let ordinal = self.pictures.len();
        self.pictures.push(picture);
        self.fragments.push(Fragment::Image { ordinal });
    }

    /// Replace member fragments of every merged group.
    ///
    /// The first member gets the merged grid, the others the merge marker.
    /// Only the first fragment of each member table is touched. Returns the
    /// number of groups spliced.
    pub fn splice_tables(&mut self, groups: &[TableGroup]) -> usize {
        let mut spliced = 0;
        for group in groups.iter().filter(|g| g.is_merged()) {
            let merged = render_grid(&group.grid);
            for (position, &member) in group.indices.iter().enumerate() {
                let slot = self.fragments.iter_mut().find_map(|f| match f {
                    Fragment::Table { index, markdown } if *index == member => Some(markdown),
                    _ => None,
                });
                let Some(markdown) = slot else {
                    log::warn!(
                        "Table {} of merged group {:?} has no fragment; left unmodified",
                        member,
                        group.indices
                    );
                    continue;
                };
                *markdown = if position == 0 {
                    merged.clone()
                } else {
                    MERGED_TABLE_MARKER.to_string()
                };
            }
            spliced += 1;
        }
        spliced
    }

    /// Turn each image fragment into its image link, or drop it.
    ///
    /// `images[n]` is the outcome for ordinal `n`. Each image fragment is
    /// resolved once; an ordinal without an outcome is dropped. Returns the
    /// number of links written.
    pub fn resolve_images(&mut self, images: &[SavedImage], alt_text: &str) -> usize {
        let mut linked = 0;
        self.fragments = std::mem::take(&mut self.fragments)
            .into_iter()
            .filter_map(|fragment| match fragment {
                Fragment::Image { ordinal } => match images.get(ordinal).and_then(SavedImage::path) {
                    Some(path) => {
                        linked += 1;
                        Some(Fragment::Markdown(format!("![{}]({})", alt_text, path)))
                    }
                    None => {
                        if ordinal >= images.len() {
                            log::warn!("Image {} has no saved outcome; dropped", ordinal);
                        }
                        None
                    }
                },
                other => Some(other),
            })
            .collect();
        linked
    }

    /// Join fragments with blank lines. Unresolved images appear as placeholders.
    pub fn assemble(&self) -> String {
        self.fragments
            .iter()
            .map(Fragment::as_markdown)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Reconstruct a body without persisting images.
pub fn reconstruct(model: &DocumentModel, options: &ReconstructOptions) -> ReconstructResult {
    DocumentReconstructor::new(options.clone()).reconstruct(model, None)
}

/// Reconstruct a body and return only the markdown.
pub fn to_markdown(model: &DocumentModel, options: &ReconstructOptions) -> String {
    reconstruct(model, options).content
}

/// Stable sort by page, then vertical offset. Items without provenance last.
pub fn visual_order(items: &[DocumentItem]) -> Vec<&DocumentItem> {
    let mut ordered: Vec<&DocumentItem> = items.iter().collect();
    ordered.sort_by(|a, b| match (a.prov, b.prov) {
        (Some(pa), Some(pb)) => pa
            .page_no
            .cmp(&pb.page_no)
            .then(pa.top_offset.total_cmp(&pb.top_offset)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    ordered
}

/// Rebuilds the reading-order body of a document model.
pub struct DocumentReconstructor {
    options: ReconstructOptions,
    stats: ReconstructStats,
}

impl DocumentReconstructor {
    /// Create a new reconstructor.
    pub fn new(options: ReconstructOptions) -> Self {
        Self {
            options,
            stats: ReconstructStats::new(),
        }
    }

    /// Statistics collected so far.
    pub fn stats(&self) -> &ReconstructStats {
        &self.stats
    }

    /// Order, filter, and render items into fragments.
    pub fn build(&mut self, model: &DocumentModel) -> ReconstructedText {
        let mut text = ReconstructedText::default();
        let renderer = MarkdownRenderer::new(&self.options);

        for item in visual_order(&model.items) {
            if item.label.is_furniture() {
                self.stats.furniture_dropped += 1;
                continue;
            }
            if self.options.is_boilerplate(item.trimmed_text()) {
                log::debug!("Dropping boilerplate item: {:?}", item.trimmed_text());
                self.stats.boilerplate_dropped += 1;
                continue;
            }

            let before = text.fragments.len();
            match item.label {
                ItemLabel::Table => {
                    self.stats.table_count += 1;
                    let grid = item
                        .table
                        .and_then(|i| model.tables.get(i).map(|g| (i, render_grid(g))))
                        .filter(|(_, markdown)| !markdown.is_empty());
                    match grid {
                        Some((index, markdown)) => text.push(Fragment::Table { index, markdown }),
                        None => {
                            if let Some(fallback) = renderer.render_item(item) {
                                text.push(Fragment::Markdown(fallback));
                            }
                        }
                    }
                }
                ItemLabel::Picture => {
                    if let Some(caption) = renderer.render_item(item) {
                        text.push(Fragment::Markdown(caption));
                    }
                    text.push_image(item.picture);
                    self.stats.image_count += 1;
                }
                _ => {
                    if let Some(markdown) = renderer.render_item(item) {
                        match item.label {
                            ItemLabel::SectionHeader => self.stats.heading_count += 1,
                            ItemLabel::ListItem => self.stats.list_item_count += 1,
                            _ => {}
                        }
                        text.push(Fragment::Markdown(markdown));
                    }
                }
            }
            if text.fragments.len() > before {
                self.stats.items_rendered += 1;
            }
        }

        text
    }

    /// Run a full pass.
    ///
    /// With `images_dir` set, pictures are written there; otherwise every
    /// placeholder is removed.
    pub fn reconstruct(
        mut self,
        model: &DocumentModel,
        images_dir: Option<&Path>,
    ) -> ReconstructResult {
        self.stats.page_count = model.page_count();

        let mut text = self.build(model);

        if self.options.merge_tables {
            let groups = merge_tables(&model.tables);
            self.stats.merged_groups = text.splice_tables(&groups) as u32;
        }

        let images = save_images(model, text.pictures(), images_dir, &self.options);
        self.stats.images_saved = images.iter().filter(|i| i.is_saved()).count() as u32;
        self.stats.images_skipped = images.len() as u32 - self.stats.images_saved;

        text.resolve_images(&images, &self.options.image_alt_text);
        let mut content = text.assemble();

        if let Some(ref cleanup_options) = self.options.cleanup {
            content = CleanupPipeline::new(cleanup_options.clone()).process(&content);
        }
        let content = content.trim().to_string();

        self.stats.count_text(&content);
        log::debug!(
            "Reconstructed {} items into {} chars",
            self.stats.items_rendered,
            content.len()
        );

        ReconstructResult {
            content,
            images,
            stats: self.stats,
        }
    }
}
