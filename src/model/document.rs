//! Document-level types.

use super::{DocumentItem, Grid, ItemLabel, Picture};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The structured output of the upstream layout engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentModel {
    /// Where the model came from
    #[serde(default)]
    pub origin: Origin,

    /// Layout items in extraction order
    #[serde(default)]
    pub items: Vec<DocumentItem>,

    /// Table grids referenced by TABLE items
    #[serde(default)]
    pub tables: Vec<Grid>,

    /// Pictures referenced by PICTURE items
    #[serde(default)]
    pub pictures: Vec<Picture>,

    /// Directory used to resolve relative picture paths
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl DocumentModel {
    /// Create a new empty document model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a model from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let model: DocumentModel = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Read a model from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::InputNotFound(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path)?;
        let mut model = Self::from_json(&json)?;
        model.base_dir = path.parent().map(Path::to_path_buf);
        if model.origin.filename.is_none() {
            model.origin.filename = path.file_name().map(|n| n.to_string_lossy().into_owned());
        }
        Ok(model)
    }

    /// Add an item.
    pub fn add_item(&mut self, item: DocumentItem) {
        self.items.push(item);
    }

    /// Add a table grid together with the TABLE item that places it.
    pub fn add_table(&mut self, grid: Grid, page_no: u32, top_offset: f32) -> usize {
        let index = self.tables.len();
        self.tables.push(grid);
        self.items
            .push(DocumentItem::table(index).at(page_no, top_offset));
        index
    }

    /// Add a picture together with the PICTURE item that places it.
    pub fn add_picture(
        &mut self,
        picture: Picture,
        caption: impl Into<String>,
        page_no: u32,
        top_offset: f32,
    ) -> usize {
        let index = self.pictures.len();
        self.pictures.push(picture);
        self.items
            .push(DocumentItem::picture(index, caption).at(page_no, top_offset));
        index
    }

    /// Check that every table and picture reference resolves.
    pub fn validate(&self) -> Result<()> {
        for item in &self.items {
            if let Some(index) = item.table {
                if index >= self.tables.len() {
                    return Err(Error::DanglingReference {
                        kind: "table",
                        index,
                        count: self.tables.len(),
                    });
                }
            }
            if let Some(index) = item.picture {
                if index >= self.pictures.len() {
                    return Err(Error::DanglingReference {
                        kind: "picture",
                        index,
                        count: self.pictures.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Check if the model has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Highest page number referenced by item provenance.
    pub fn page_count(&self) -> u32 {
        self.items
            .iter()
            .filter_map(|i| i.prov.map(|p| p.page_no))
            .max()
            .unwrap_or(0)
    }

    /// Count items with a given label.
    pub fn count_label(&self, label: ItemLabel) -> usize {
        self.items.iter().filter(|i| i.label == label).count()
    }
}

/// Provenance of the whole model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Origin {
    /// Source file name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Layout/OCR engine that produced the model
    #[serde(default = "default_engine")]
    pub engine: String,

    /// Whether OCR was enabled for the source
    #[serde(default)]
    pub ocr_enabled: bool,
}

fn default_engine() -> String {
    "unknown".to_string()
}

impl Default for Origin {
    fn default() -> Self {
        Self {
            filename: None,
            engine: default_engine(),
            ocr_enabled: false,
        }
    }
}

impl Origin {
    /// Human-readable header block prepended to the body on disk.
    pub fn to_header_block(&self) -> String {
        format!(
            "> Layout engine: **{}** (OCR enabled: {})\n\nFile: `{}`\n\n---\n\n",
            self.engine,
            self.ocr_enabled,
            self.filename.as_deref().unwrap_or("unknown"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = DocumentModel::new();
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 0);
    }

    #[test]
    fn test_from_json_minimal() {
        let json = r#"{
            "origin": {"filename": "report.pdf", "engine": "easyocr", "ocr_enabled": true},
            "items": [
                {"label": "section_header", "text": "Title", "level": 1, "prov": {"page_no": 1, "top_offset": 10.0}},
                {"label": "table", "table": 0, "prov": {"page_no": 2, "top_offset": 5.0}}
            ],
            "tables": [{"columns": ["A", "B"], "rows": [["1", "2"]]}]
        }"#;

        let doc = DocumentModel::from_json(json).unwrap();
        assert_eq!(doc.items.len(), 2);
        assert_eq!(doc.tables[0].row_count(), 1);
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.count_label(ItemLabel::Table), 1);
        assert!(doc.origin.ocr_enabled);
    }

    #[test]
    fn test_dangling_table_reference() {
        let json = r#"{"items": [{"label": "table", "table": 3}]}"#;
        let err = DocumentModel::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            Error::DanglingReference { kind: "table", index: 3, count: 0 }
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = DocumentModel::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));
    }

    #[test]
    fn test_header_block() {
        let origin = Origin {
            filename: Some("scan.pdf".into()),
            engine: "rapidocr".into(),
            ocr_enabled: true,
        };
        let header = origin.to_header_block();
        assert!(header.starts_with("> Layout engine: **rapidocr** (OCR enabled: true)"));
        assert!(header.contains("File: `scan.pdf`"));
        assert!(header.ends_with("---\n\n"));
    }
}
