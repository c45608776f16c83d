//! Markdown rendering for document items and table grids.

use crate::model::{DocumentItem, Grid, ItemLabel};

use super::ReconstructOptions;

/// Render a grid as a GitHub pipe table.
///
/// Ragged rows are padded to the header width. Returns an empty string for
/// an empty grid.
pub fn render_grid(grid: &Grid) -> String {
    let col_count = grid.column_count();
    if col_count == 0 {
        return String::new();
    }

    let mut output = String::new();
    push_row(&mut output, &grid.effective_columns(), col_count);

    output.push('|');
    for _ in 0..col_count {
        output.push_str(" --- |");
    }
    output.push('\n');

    for row in &grid.rows {
        push_row(&mut output, row, col_count);
    }

    output.trim_end().to_string()
}

fn push_row(output: &mut String, cells: &[String], col_count: usize) {
    output.push('|');
    for i in 0..col_count {
        let content = cells.get(i).map(|c| escape_cell(c)).unwrap_or_default();
        if content.is_empty() {
            output.push_str("  |");
        } else {
            output.push_str(&format!(" {} |", content));
        }
    }
    output.push('\n');
}

/// Flatten a cell to one line and escape the pipe delimiter.
fn escape_cell(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}

/// Markdown renderer for single items.
///
/// Tables and pictures are handled by the reconstructor, which binds them to
/// fragments; this renderer covers everything that maps to plain markdown.
pub struct MarkdownRenderer<'a> {
    options: &'a ReconstructOptions,
}

impl<'a> MarkdownRenderer<'a> {
    /// Create a renderer.
    pub fn new(options: &'a ReconstructOptions) -> Self {
        Self { options }
    }

    /// Render a text-bearing item. Returns `None` when it renders to nothing.
    pub fn render_item(&self, item: &DocumentItem) -> Option<String> {
        let text = item.trimmed_text();
        match item.label {
            ItemLabel::SectionHeader => {
                if text.is_empty() {
                    return None;
                }
                let level = item
                    .level
                    .unwrap_or(1)
                    .clamp(1, self.options.max_heading_level.max(1));
                Some(format!("{} {}", "#".repeat(level as usize), text))
            }
            ItemLabel::ListItem => {
                if text.is_empty() {
                    return None;
                }
                Some(format!("{} {}", self.options.list_marker, text))
            }
            ItemLabel::Code => {
                if text.is_empty() {
                    return None;
                }
                Some(format!("```\n{}\n```", text))
            }
            ItemLabel::Header | ItemLabel::Footer => None,
            ItemLabel::Table | ItemLabel::Picture | ItemLabel::Text => {
                if text.is_empty() {
                    None
                } else {
                    Some(text.to_string())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_grid() {
        let grid = Grid::with_columns(["Name", "Age"])
            .row(["Alice", "30"])
            .row(["Bob"]);
        assert_eq!(
            render_grid(&grid),
            "| Name | Age |\n| --- | --- |\n| Alice | 30 |\n| Bob |  |"
        );
    }

    #[test]
    fn test_render_grid_escapes_pipes() {
        let grid = Grid::with_columns(["a|b"]).row(["line\nbreak"]);
        assert_eq!(
            render_grid(&grid),
            "| a\\|b |\n| --- |\n| line break |"
        );
    }

    #[test]
    fn test_render_headerless_grid() {
        let grid = Grid::new().row(["x", "y"]);
        assert!(render_grid(&grid).starts_with("| 0 | 1 |"));
        assert_eq!(render_grid(&Grid::new()), "");
    }

    #[test]
    fn test_render_heading_levels() {
        let options = ReconstructOptions::default();
        let renderer = MarkdownRenderer::new(&options);

        let h = DocumentItem::heading("Intro", 2);
        assert_eq!(renderer.render_item(&h).as_deref(), Some("## Intro"));

        let zero = DocumentItem::heading("Top", 0);
        assert_eq!(renderer.render_item(&zero).as_deref(), Some("# Top"));

        let none = DocumentItem::new(ItemLabel::SectionHeader, "Untitled");
        assert_eq!(renderer.render_item(&none).as_deref(), Some("# Untitled"));

        let empty = DocumentItem::heading("   ", 1);
        assert_eq!(renderer.render_item(&empty), None);
    }

    #[test]
    fn test_render_list_code_text() {
        let options = ReconstructOptions::default();
        let renderer = MarkdownRenderer::new(&options);

        let li = DocumentItem::list_item("  first ");
        assert_eq!(renderer.render_item(&li).as_deref(), Some("* first"));

        let code = DocumentItem::new(ItemLabel::Code, "fn main() {}");
        assert_eq!(
            renderer.render_item(&code).as_deref(),
            Some("```\nfn main() {}\n```")
        );
        let blank_code = DocumentItem::new(ItemLabel::Code, " \n ");
        assert_eq!(renderer.render_item(&blank_code), None);

        let text = DocumentItem::text("Plain paragraph.");
        assert_eq!(
            renderer.render_item(&text).as_deref(),
            Some("Plain paragraph.")
        );
        assert_eq!(renderer.render_item(&DocumentItem::text("")), None);
    }
}
