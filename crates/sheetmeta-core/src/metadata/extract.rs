//! Row field extraction within a detected table.

use std::collections::BTreeMap;
use tracing::{debug, trace};

use sheetmeta_engine::engine::{CellRef, resolve_references};

use super::detect::TableRegion;
use super::names::{clean_text, disambiguate};
use super::{DependencyRef, RowEntry};
use crate::config::ExtractConfig;
use crate::workbook::CellIndex;

/// Extract the named rows of one table.
///
/// Populated rows strictly below the header and before `region.end_row` are
/// considered; a row exists only if its label cell holds plain text.
pub fn extract_rows(
    sheet_name: &str,
    region: &TableRegion,
    index: &CellIndex<'_>,
    config: &ExtractConfig,
) -> BTreeMap<String, RowEntry> {
    let value_col = config.value_column_for(sheet_name);
    let mut rows = BTreeMap::new();

    let first_row = region.header.row.saturating_add(1);
    for (row, _) in index.rows_in(first_row..region.end_row) {
        let text_at = |col: usize| index.get(row, col).and_then(|c| c.text.as_deref());

        let label = clean_text(text_at(config.label_column), false);
        if label.is_empty() {
            continue;
        }
        let auxiliary_text = clean_text(text_at(config.auxiliary_column), false);

        let value_cell = index.get(row, value_col);
        let formula_text = clean_text(value_cell.and_then(|c| c.text.as_deref()), true);
        let origin = value_cell.map(|_| CellRef::new(row, value_col));

        let dependencies = match origin {
            Some(origin) => resolve_dependencies(sheet_name, &formula_text, origin),
            None => Vec::new(),
        };

        let name = disambiguate(&label, &rows);
        trace!(
            "Row '{}' in '{}': value at {:?}, {} references",
            name,
            region.header.name,
            origin.map(|o| o.to_string()),
            dependencies.len()
        );
        rows.insert(
            name,
            RowEntry {
                cell_address: origin.map(|o| o.to_string()),
                formula_text,
                auxiliary_text,
                dependencies,
            },
        );
    }

    debug!("Table '{}': {} named rows", region.header.name, rows.len());
    rows
}

/// Operands of the formula stored at `origin` on `sheet_name`.
///
/// Only text starting with `=` is a formula; anything else has no operands.
/// Unqualified references belong to `sheet_name`.
pub fn resolve_dependencies(sheet_name: &str, formula: &str, origin: CellRef) -> Vec<DependencyRef> {
    if !formula.starts_with('=') {
        return Vec::new();
    }
    resolve_references(formula, origin)
        .into_iter()
        .map(|r| DependencyRef {
            sheet: r.sheet.unwrap_or_else(|| sheet_name.to_string()),
            row: r.row,
            col: r.col,
        })
        .collect()
}

/// Like [`resolve_dependencies`], with the formula cell given as an A1 address.
///
/// An unparseable address yields no dependencies.
pub fn resolve_dependencies_from_address(
    sheet_name: &str,
    formula: &str,
    address: &str,
) -> Vec<DependencyRef> {
    match CellRef::from_str(address) {
        Some(origin) => resolve_dependencies(sheet_name, formula, origin),
        None => Vec::new(),
    }
}
