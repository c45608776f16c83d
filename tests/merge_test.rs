//! Integration tests for multi-page table merging.

use docstitch::{merge_tables, Grid, MergeStrategy};

fn grid(columns: &[&str], rows: usize, tag: &str) -> Grid {
    (0..rows).fold(Grid::with_columns(columns.iter().copied()), |g, r| {
        g.row(columns.iter().map(|c| format!("{}{}{}", tag, c, r)))
    })
}

#[test]
fn test_identical_headers_sum_rows() {
    let tables = vec![grid(&["A", "B"], 4, "t0"), grid(&["A", "B"], 3, "t1")];
    let groups = merge_tables(&tables);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].grid.row_count(), 7);
    assert_eq!(groups[0].grid.columns, vec!["A", "B"]);
    assert_eq!(groups[0].grid.rows[4], vec!["t1A0", "t1B0"]);
}

#[test]
fn test_positional_header_renamed() {
    let tables = vec![grid(&["Name", "Qty"], 2, "a"), grid(&["0", "1"], 2, "b")];
    let groups = merge_tables(&tables);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].grid.columns, vec!["Name", "Qty"]);
    assert_eq!(groups[0].grid.row_count(), 4);
    assert_eq!(groups[0].strategies, vec![MergeStrategy::RenamedPositional]);
}

#[test]
fn test_headerless_continuation_renamed() {
    let continuation = Grid::new().row(["x", "y"]);
    let groups = merge_tables(&[grid(&["Name", "Qty"], 1, "a"), continuation]);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].grid.row_count(), 2);
    assert_eq!(groups[0].grid.rows[1], vec!["x", "y"]);
}

#[test]
fn test_other_header_becomes_data_row() {
    let previous = grid(&["Date", "Event"], 5, "p");
    let incoming = grid(&["12/03", "Hearing"], 2, "i");
    let groups = merge_tables(&[previous, incoming]);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].grid.row_count(), 5 + 1 + 2);
    assert_eq!(groups[0].grid.rows[5], vec!["12/03", "Hearing"]);
    assert_eq!(groups[0].grid.columns, vec!["Date", "Event"]);
}

#[test]
fn test_three_tables_two_groups() {
    let tables = vec![
        grid(&["A", "B"], 2, "t0"),
        grid(&["A", "B"], 1, "t1"),
        grid(&["X", "Y", "Z"], 1, "t2"),
    ];
    let groups = merge_tables(&tables);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].indices, vec![0, 1]);
    assert_eq!(groups[0].grid.row_count(), 3);
    assert!(groups[0].is_merged());
    assert_eq!(groups[1].indices, vec![2]);
    assert_eq!(groups[1].grid, tables[2]);
}

#[test]
fn test_groups_partition_all_tables() {
    let widths = [2, 2, 3, 3, 3, 1, 2, 2, 4, 4, 1];
    let tables: Vec<Grid> = widths
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let cols: Vec<String> = (0..w).map(|c| format!("c{}", c)).collect();
            let refs: Vec<&str> = cols.iter().map(String::as_str).collect();
            grid(&refs, i % 3 + 1, &format!("t{}", i))
        })
        .collect();

    let groups = merge_tables(&tables);
    let flattened: Vec<usize> = groups.iter().flat_map(|g| g.indices.clone()).collect();
    assert_eq!(flattened, (0..tables.len()).collect::<Vec<_>>());

    for group in &groups {
        assert!(!group.is_empty());
        assert!(group.indices.windows(2).all(|w| w[1] == w[0] + 1));
        assert_eq!(group.strategies.len(), group.len() - 1);
        let expected: usize = group.indices.iter().map(|&i| tables[i].row_count()).sum();
        assert_eq!(group.grid.row_count(), expected);
    }
    assert_eq!(groups.len(), 6);
}
