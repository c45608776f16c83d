//! Multi-page table merging.
//!
//! Layout engines split a table that crosses a page break into several
//! tables. This module walks the tables of one document in order and groups
//! consecutive tables with the same column count into one logical table,
//! reconciling their headers on the way.

use crate::model::Grid;
use serde::{Deserialize, Serialize};

/// How a table was folded into the group before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Header repeated across the page break
    MatchingHeader,
    /// Positional header renamed to the group header
    RenamedPositional,
    /// Mismatched header kept as the first data row
    RecoveredHeaderRow,
}

/// A contiguous run of tables treated as one logical table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableGroup {
    /// Table indices, contiguous and ascending
    pub indices: Vec<usize>,

    /// Merged grid: the seed header plus all member rows
    pub grid: Grid,

    /// Strategy applied to each member after the first
    pub strategies: Vec<MergeStrategy>,
}

impl TableGroup {
    fn seed(index: usize, grid: Grid) -> Self {
        Self {
            indices: vec![index],
            grid,
            strategies: Vec::new(),
        }
    }

    /// First member table.
    pub fn first(&self) -> usize {
        self.indices[0]
    }

    /// Whether more than one table was merged.
    pub fn is_merged(&self) -> bool {
        self.indices.len() > 1
    }

    /// Number of member tables.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Always false: a group has at least its seed table.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Fold the next table into this group if the column counts agree.
    ///
    /// Returns the table back when it starts a new group.
    fn absorb(&mut self, index: usize, mut next: Grid) -> Option<Grid> {
        if next.column_count() != self.grid.column_count() {
            return Some(next);
        }

        let strategy = if next.columns == self.grid.columns {
            MergeStrategy::MatchingHeader
        } else if next.has_positional_header() {
            next.columns = self.grid.columns.clone();
            MergeStrategy::RenamedPositional
        } else {
            let recovered = std::mem::take(&mut next.columns);
            next.rows.insert(0, recovered);
            MergeStrategy::RecoveredHeaderRow
        };

        log::debug!(
            "Merged table {} into group starting at {} ({:?})",
            index,
            self.first(),
            strategy
        );

        self.grid.extend_rows(next.rows);
        self.indices.push(index);
        self.strategies.push(strategy);
        None
    }
}

/// Group the tables of one document into logical tables.
///
/// Every table lands in exactly one group; the groups partition `0..len`.
pub fn merge_tables(tables: &[Grid]) -> Vec<TableGroup> {
    let mut iter = tables.iter().cloned().enumerate();
    let Some((first_index, first)) = iter.next() else {
        log::debug!("No tables found to merge");
        return Vec::new();
    };

    let mut groups = Vec::new();
    let mut current = TableGroup::seed(first_index, first);

    for (index, grid) in iter {
        if let Some(rejected) = current.absorb(index, grid) {
            groups.push(current);
            current = TableGroup::seed(index, rejected);
        }
    }
    groups.push(current);

    log::debug!(
        "Grouped {} tables into {} logical tables",
        tables.len(),
        groups.len()
    );
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ab(rows: usize) -> Grid {
        (0..rows).fold(Grid::with_columns(["A", "B"]), |g, i| {
            g.row([format!("a{}", i), format!("b{}", i)])
        })
    }

    #[test]
    fn test_no_tables() {
        assert!(merge_tables(&[]).is_empty());
    }

    #[test]
    fn test_single_table_is_own_group() {
        let groups = merge_tables(&[ab(2)]);
        assert_eq!(groups.len(), 1);
        assert!(!groups[0].is_merged());
        assert_eq!(groups[0].grid, ab(2));
    }

    #[test]
    fn test_matching_header_concatenates() {
        let groups = merge_tables(&[ab(2), ab(3)]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].indices, vec![0, 1]);
        assert_eq!(groups[0].grid.row_count(), 5);
        assert_eq!(groups[0].grid.columns, vec!["A", "B"]);
        assert_eq!(groups[0].strategies, vec![MergeStrategy::MatchingHeader]);
    }

    #[test]
    fn test_positional_header_is_renamed() {
        let positional = Grid::with_columns(["0", "1"]).row(["x", "y"]);
        let groups = merge_tables(&[ab(2), positional]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].grid.row_count(), 3);
        assert_eq!(groups[0].grid.rows[2], vec!["x", "y"]);
        assert_eq!(groups[0].strategies, vec![MergeStrategy::RenamedPositional]);
    }

    #[test]
    fn test_mismatched_header_becomes_row() {
        let continuation = Grid::with_columns(["a9", "b9"]).row(["a10", "b10"]);
        let groups = merge_tables(&[ab(2), continuation]);
        assert_eq!(groups[0].grid.row_count(), 2 + 1 + 1);
        assert_eq!(groups[0].grid.rows[2], vec!["a9", "b9"]);
        assert_eq!(groups[0].grid.columns, vec!["A", "B"]);
        assert_eq!(
            groups[0].strategies,
            vec![MergeStrategy::RecoveredHeaderRow]
        );
    }

    #[test]
    fn test_column_count_change_splits() {
        let wide = Grid::with_columns(["X", "Y", "Z"]).row(["1", "2", "3"]);
        let groups = merge_tables(&[ab(1), wide, ab(1)]);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[1].indices, vec![1]);
        assert_eq!(groups[2].indices, vec![2]);
    }
}
