//! Tabular grid types.

use serde::{Deserialize, Serialize};

/// A table as a header row plus ordered data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Column headers (empty = no header detected)
    #[serde(default)]
    pub columns: Vec<String>,

    /// Data rows
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl Grid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grid with the given header.
    pub fn with_columns<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a row built from text values.
    pub fn add_row<S: Into<String>>(&mut self, values: impl IntoIterator<Item = S>) {
        self.rows.push(values.into_iter().map(Into::into).collect());
    }

    /// Builder form of [`Grid::add_row`].
    pub fn row<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.add_row(values);
        self
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns: header width, or widest row when headerless.
    pub fn column_count(&self) -> usize {
        if !self.columns.is_empty() {
            return self.columns.len();
        }
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the grid has neither header nor rows.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    /// Whether the header is a positional index (`0, 1, .., n-1`) or missing.
    ///
    /// Layout engines emit such headers when they re-parse a table fragment
    /// without detecting a header row.
    pub fn has_positional_header(&self) -> bool {
        self.columns
            .iter()
            .enumerate()
            .all(|(i, c)| c.trim().parse::<usize>().ok() == Some(i))
    }

    /// Header with positional names filled in for headerless grids.
    pub fn effective_columns(&self) -> Vec<String> {
        if self.columns.is_empty() {
            (0..self.column_count()).map(|i| i.to_string()).collect()
        } else {
            self.columns.clone()
        }
    }

    /// Append all rows of another grid.
    pub fn extend_rows(&mut self, rows: impl IntoIterator<Item = Vec<String>>) {
        self.rows.extend(rows);
    }

    /// Get plain text representation (tab-separated).
    pub fn plain_text(&self) -> String {
        std::iter::once(&self.columns)
            .filter(|c| !c.is_empty())
            .chain(self.rows.iter())
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
