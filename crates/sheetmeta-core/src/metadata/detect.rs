//! Table region detection.
//!
//! A table starts at a header cell: a cell styled with the header colours
//! whose trimmed text is a plain, non-reserved label. Tables carry no border
//! or merge information, so every extent is inferred from header positions:
//!
//! - height runs to the next header row below (any column), or through the
//!   last populated row of the sheet;
//! - width runs to the widest populated column across every row the table
//!   spans, starting at the header's own column.
//!
//! Both are clamped to at least 1.

use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};
use tracing::debug;

use sheetmeta_engine::engine::CellRef;

use super::names::clean_text;
use crate::config::ExtractConfig;
use crate::workbook::CellIndex;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderCell {
    pub row: usize,
    pub col: usize,
    /// Trimmed header text, before disambiguation.
    pub name: String,
}

/// The inferred extent of one table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRegion {
    pub header: HeaderCell,
    pub height: usize,
    pub width: usize,
    /// First row past the table (exclusive).
    pub end_row: usize,
}

/// Header cells of a sheet, ordered by (row, column).
pub fn detect_headers(index: &CellIndex<'_>, config: &ExtractConfig) -> Vec<HeaderCell> {
    let mut headers = Vec::new();
    for (pos, cell) in index.iter() {
        if !config.header_style.matches(cell) {
            continue;
        }
        let name = clean_text(cell.text.as_deref(), false);
        if name.is_empty() {
            continue;
        }
        if config.is_ignored_header(&name) {
            debug!("Ignoring reserved header '{}' at {}", name, pos);
            continue;
        }
        headers.push(HeaderCell {
            row: pos.row,
            col: pos.col,
            name,
        });
    }
    // `CellIndex` iterates row-major; sorting keeps the order explicit.
    headers.sort_by_key(|h| (h.row, h.col));
    headers
}

/// Detect every table region on a sheet, in header order.
pub fn detect_regions(index: &CellIndex<'_>, config: &ExtractConfig) -> Vec<TableRegion> {
    let headers = detect_headers(index, config);
    let header_rows: BTreeSet<usize> = headers.iter().map(|h| h.row).collect();

    headers
        .into_iter()
        .map(|header| {
            let next_header_row = header_rows
                .range((Excluded(header.row), Unbounded))
                .next()
                .copied();
            let last_row = index.last_row().unwrap_or(header.row);

            let (height, end_row) = match next_header_row {
                Some(next) => (next - header.row, next),
                None => (
                    last_row.saturating_add(1).saturating_sub(header.row),
                    last_row.max(header.row).saturating_add(1),
                ),
            };

            let max_col = index
                .rows_in(header.row..end_row)
                .filter_map(|(_, cols)| cols.last().copied())
                .fold(header.col, usize::max);
            let width = (max_col - header.col).saturating_add(1);

            let region = TableRegion {
                height: height.max(1),
                width: width.max(1),
                end_row,
                header,
            };
            debug!(
                "Table '{}' at {}: {} rows x {} columns",
                region.header.name,
                CellRef::new(region.header.row, region.header.col),
                region.height,
                region.width
            );
            region
        })
        .collect()
}
