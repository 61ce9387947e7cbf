//! Label inventories handed to definition and embedding generators.
//!
//! Those generators key their results by `(term, table, sheet)`; this module
//! only collects the keys.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::ExtractConfig;
use crate::metadata::Metadata;
use crate::metadata::names::clean_text;
use crate::workbook::Workbook;

/// One row name together with where it was found.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TermRef {
    pub term: String,
    pub source_table: String,
    pub source_sheet: String,
}

/// Every extracted row as a `(term, table, sheet)` triple, sheet-major.
pub fn term_inventory(metadata: &Metadata) -> Vec<TermRef> {
    let mut terms = Vec::new();
    for (sheet_name, sheet) in &metadata.sheets {
        for (table_name, table) in &sheet.tables {
            for row_name in table.rows.keys() {
                terms.push(TermRef {
                    term: row_name.clone(),
                    source_table: table_name.clone(),
                    source_sheet: sheet_name.clone(),
                });
            }
        }
    }
    terms
}

/// Label column texts exactly as stored, per sheet. Sheets with none are left out.
///
/// Formulas and blank cells are skipped; surrounding whitespace is kept.
pub fn raw_labels(workbook: &Workbook, config: &ExtractConfig) -> BTreeMap<String, Vec<String>> {
    let mut out = BTreeMap::new();
    for sheet in &workbook.sheets {
        let index = sheet.index();
        let labels: Vec<String> = index
            .iter()
            .filter(|(pos, _)| pos.col == config.label_column)
            .filter_map(|(_, cell)| cell.text.as_deref())
            .filter(|text| !text.starts_with('=') && !text.trim().is_empty())
            .map(str::to_string)
            .collect();
        if !labels.is_empty() {
            out.insert(sheet.name.clone(), labels);
        }
    }
    out
}

/// Plain texts styled like ordinary labels, per sheet.
///
/// Only columns at or right of the sheet's configured minimum are scanned.
/// Every sheet gets an entry, possibly empty.
pub fn styled_labels(workbook: &Workbook, config: &ExtractConfig) -> BTreeMap<String, Vec<String>> {
    workbook
        .sheets
        .iter()
        .map(|sheet| {
            let min_col = config.label_min_column_for(&sheet.name);
            let index = sheet.index();
            let labels = index
                .iter()
                .filter(|(pos, cell)| pos.col >= min_col && config.label_style.matches(cell))
                .map(|(_, cell)| clean_text(cell.text.as_deref(), false))
                .filter(|text| !text.is_empty())
                .collect();
            (sheet.name.clone(), labels)
        })
        .collect()
}
