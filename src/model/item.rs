//! Layout items produced by the upstream document engine.

use serde::{Deserialize, Serialize};

/// Kind of layout element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemLabel {
    /// Page header furniture (letterheads, running titles)
    Header,
    /// Page footer furniture (page numbers, disclaimers)
    Footer,
    /// Section heading
    SectionHeader,
    /// Bullet or numbered list entry
    ListItem,
    /// Table with an attached grid
    Table,
    /// Figure or picture
    Picture,
    /// Code listing
    Code,
    /// Body text and anything unrecognized
    Text,
}

impl ItemLabel {
    /// Canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemLabel::Header => "header",
            ItemLabel::Footer => "footer",
            ItemLabel::SectionHeader => "section_header",
            ItemLabel::ListItem => "list_item",
            ItemLabel::Table => "table",
            ItemLabel::Picture => "picture",
            ItemLabel::Code => "code",
            ItemLabel::Text => "text",
        }
    }

    /// Whether this label marks page furniture that never reaches the body.
    pub fn is_furniture(&self) -> bool {
        matches!(self, ItemLabel::Header | ItemLabel::Footer)
    }
}

impl From<String> for ItemLabel {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "header" | "page_header" => ItemLabel::Header,
            "footer" | "page_footer" => ItemLabel::Footer,
            "section_header" | "title" => ItemLabel::SectionHeader,
            "list_item" => ItemLabel::ListItem,
            "table" => ItemLabel::Table,
            "picture" | "figure" => ItemLabel::Picture,
            "code" => ItemLabel::Code,
            _ => ItemLabel::Text,
        }
    }
}

impl From<ItemLabel> for String {
    fn from(label: ItemLabel) -> Self {
        label.as_str().to_string()
    }
}

impl std::fmt::Display for ItemLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an item sits on its page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    /// 1-indexed page number
    pub page_no: u32,

    /// Vertical distance from the top of the page
    pub top_offset: f32,
}

impl Provenance {
    /// Create a provenance record.
    pub fn new(page_no: u32, top_offset: f32) -> Self {
        Self {
            page_no,
            top_offset,
        }
    }
}

/// One layout element of the document model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentItem {
    /// Element kind
    pub label: ItemLabel,

    /// Text content (may be empty)
    #[serde(default)]
    pub text: String,

    /// Heading nesting depth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,

    /// Page position, when the engine reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prov: Option<Provenance>,

    /// Index into the document's table list (TABLE items)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<usize>,

    /// Index into the document's picture list (PICTURE items)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<usize>,
}

impl DocumentItem {
    /// Create an item with a label and text.
    pub fn new(label: ItemLabel, text: impl Into<String>) -> Self {
        Self {
            label,
            text: text.into(),
            level: None,
            prov: None,
            table: None,
            picture: None,
        }
    }

    /// Create a body text item.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ItemLabel::Text, text)
    }

    /// Create a section heading.
    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        Self::new(ItemLabel::SectionHeader, text).with_level(level)
    }

    /// Create a list entry.
    pub fn list_item(text: impl Into<String>) -> Self {
        Self::new(ItemLabel::ListItem, text)
    }

    /// Create a table item bound to a grid index.
    pub fn table(index: usize) -> Self {
        Self {
            table: Some(index),
            ..Self::new(ItemLabel::Table, "")
        }
    }

    /// Create a picture item bound to a picture index.
    pub fn picture(index: usize, caption: impl Into<String>) -> Self {
        Self {
            picture: Some(index),
            ..Self::new(ItemLabel::Picture, caption)
        }
    }

    /// Set heading level.
    pub fn with_level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }

    /// Set page position.
    pub fn at(mut self, page_no: u32, top_offset: f32) -> Self {
        self.prov = Some(Provenance::new(page_no, top_offset));
        self
    }

    /// Trimmed text content.
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_aliases() {
        assert_eq!(ItemLabel::from("page_header".to_string()), ItemLabel::Header);
        assert_eq!(ItemLabel::from("PAGE_FOOTER".to_string()), ItemLabel::Footer);
        assert_eq!(
            ItemLabel::from("SECTION_HEADER".to_string()),
            ItemLabel::SectionHeader
        );
        assert_eq!(ItemLabel::from("caption".to_string()), ItemLabel::Text);
    }

    #[test]
    fn test_item_roundtrip_json() {
        let item = DocumentItem::heading("Intro", 2).at(1, 40.0);
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"label\":\"section_header\""));

        let back: DocumentItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back.label, ItemLabel::SectionHeader);
        assert_eq!(back.level, Some(2));
        assert_eq!(back.prov.map(|p| p.page_no), Some(1));
    }

    #[test]
    fn test_missing_text_defaults_empty() {
        let item: DocumentItem = serde_json::from_str(r#"{"label":"picture","picture":0}"#).unwrap();
        assert_eq!(item.text, "");
        assert_eq!(item.picture, Some(0));
    }
}
