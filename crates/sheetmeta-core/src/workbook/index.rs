//! Position lookups over one sheet's cells.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeBounds;

use sheetmeta_engine::engine::CellRef;

use super::Cell;

/// Lookup structures built once per sheet.
///
/// Records without a row or column index are dropped. When two records share
/// a position the one later in the dump wins.
#[derive(Debug, Default)]
pub struct CellIndex<'a> {
    cells: BTreeMap<CellRef, &'a Cell>,
    row_columns: BTreeMap<usize, BTreeSet<usize>>,
    dropped: usize,
}

impl<'a> CellIndex<'a> {
    pub fn build(cells: &'a [Cell]) -> Self {
        let mut index = CellIndex::default();
        for cell in cells {
            let (Some(row), Some(col)) = (cell.row, cell.col) else {
                index.dropped += 1;
                continue;
            };
            index.cells.insert(CellRef::new(row, col), cell);
            index.row_columns.entry(row).or_default().insert(col);
        }
        index
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&'a Cell> {
        self.cells.get(&CellRef::new(row, col)).copied()
    }

    /// Columns populated in `row`, ascending.
    pub fn columns_in_row(&self, row: usize) -> Option<&BTreeSet<usize>> {
        self.row_columns.get(&row)
    }

    pub fn max_column_in_row(&self, row: usize) -> Option<usize> {
        self.row_columns.get(&row).and_then(|cols| cols.last().copied())
    }

    /// Populated rows within `rows`, ascending, with their columns.
    ///
    /// Empty rows are skipped, so cost follows the number of populated rows.
    pub fn rows_in<R>(&self, rows: R) -> impl Iterator<Item = (usize, &BTreeSet<usize>)> + '_
    where
        R: RangeBounds<usize>,
    {
        self.row_columns.range(rows).map(|(row, cols)| (*row, cols))
    }

    /// Last row holding any cell.
    pub fn last_row(&self) -> Option<usize> {
        self.row_columns.keys().next_back().copied()
    }

    /// Cells in (row, column) order.
    pub fn iter(&self) -> impl Iterator<Item = (CellRef, &'a Cell)> + '_ {
        self.cells.iter().map(|(pos, cell)| (*pos, *cell))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of records dropped for lacking a position.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_indexes_rows_and_positions() {
        let cells = vec![
            Cell::new(2, 1, "Revenue"),
            Cell::new(2, 4, "x"),
            Cell::new(5, 0, "y"),
        ];
        let index = CellIndex::build(&cells);
        assert_eq!(index.len(), 3);
        assert_eq!(index.get(2, 4).and_then(|c| c.text.as_deref()), Some("x"));
        assert!(index.get(4, 4).is_none());
        assert_eq!(index.max_column_in_row(2), Some(4));
        assert_eq!(index.max_column_in_row(3), None);
        assert_eq!(index.last_row(), Some(5));
        let cols: Vec<_> = index.columns_in_row(2).unwrap().iter().copied().collect();
        assert_eq!(cols, vec![1, 4]);
    }

    #[test]
    fn test_cells_without_position_are_dropped() {
        let cells = vec![
            Cell { row: None, col: Some(1), ..Default::default() },
            Cell { row: Some(1), col: None, ..Default::default() },
            Cell::new(0, 0, "kept"),
        ];
        let index = CellIndex::build(&cells);
        assert_eq!(index.len(), 1);
        assert_eq!(index.dropped(), 2);
    }

    #[test]
    fn test_later_duplicate_wins() {
        let cells = vec![Cell::new(0, 0, "first"), Cell::new(0, 0, "second")];
        let index = CellIndex::build(&cells);
        assert_eq!(index.get(0, 0).and_then(|c| c.text.as_deref()), Some("second"));
    }

    #[test]
    fn test_iteration_is_row_major() {
        let cells = vec![Cell::new(1, 0, "c"), Cell::new(0, 5, "b"), Cell::new(0, 1, "a")];
        let index = CellIndex::build(&cells);
        let order: Vec<_> = index.iter().map(|(pos, _)| pos.to_string()).collect();
        assert_eq!(order, vec!["B1", "F1", "A2"]);
    }

    #[test]
    fn test_rows_in_skips_empty_rows() {
        let cells = vec![
            Cell::new(0, 0, "top"),
            Cell::new(3, 2, "a"),
            Cell::new(3, 7, "b"),
            Cell::new(200_000_000, 1, "far"),
            Cell::new(usize::MAX, 0, "edge"),
        ];
        let index = CellIndex::build(&cells);
        let rows: Vec<_> = index.rows_in(1..200_000_000).map(|(row, _)| row).collect();
        assert_eq!(rows, vec![3]);
        let widest: Vec<_> = index.rows_in(1..).map(|(_, cols)| cols.last().copied()).collect();
        assert_eq!(widest, vec![Some(7), Some(1), Some(0)]);
    }

    #[test]
    fn test_empty_sheet() {
        let index = CellIndex::build(&[]);
        assert!(index.is_empty());
        assert_eq!(index.last_row(), None);
    }
}
