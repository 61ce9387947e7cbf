//! Table and row metadata reconstructed from a workbook.
//!
//! The serialized form is the metadata tree consumed by exporters and the
//! definition generator:
//!
//! ```text
//! { sheet: { "tables": { table: { "row_count", "column_count",
//!     "rows": { row: { "cell_address", "formula_text", "auxiliary_text",
//!                      "dependencies": [ { "sheet", "row", "col" } ] } } } } } }
//! ```

pub mod detect;
pub mod extract;
pub mod names;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use sheetmeta_engine::engine::{CellRef, DependencyGraph, qualified_id};

use crate::config::ExtractConfig;
use crate::graph::build_dependency_graph;
use crate::workbook::{Sheet, Workbook};
use detect::detect_regions;
use extract::{extract_rows, resolve_dependencies_from_address};
use names::disambiguate;

/// One formula operand, in absolute 0-based coordinates.
///
/// Nothing guarantees a cell exists there; offsets may even be negative.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyRef {
    pub sheet: String,
    pub row: i64,
    pub col: i64,
}

impl DependencyRef {
    /// Graph key, e.g. `debt!F6`.
    pub fn qualified_id(&self) -> String {
        qualified_id(&self.sheet, self.row, self.col)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowEntry {
    /// A1 address of the row's value cell; None when that cell is absent.
    pub cell_address: Option<String>,
    pub formula_text: String,
    pub auxiliary_text: String,
    #[serde(default)]
    pub dependencies: Vec<DependencyRef>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Position of the header cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<CellRef>,
    pub row_count: usize,
    pub column_count: usize,
    #[serde(default)]
    pub rows: BTreeMap<String, RowEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetMetadata {
    #[serde(default)]
    pub tables: BTreeMap<String, Table>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    pub sheets: BTreeMap<String, SheetMetadata>,
}

impl Metadata {
    pub fn from_json_str(content: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Recompute every row's dependencies from its address and formula.
    ///
    /// Used on metadata read back from disk, where dependency lists may be
    /// stale or missing. Rows without an address end up with none.
    pub fn refresh_dependencies(&mut self) {
        for (sheet_name, sheet) in &mut self.sheets {
            for table in sheet.tables.values_mut() {
                for row in table.rows.values_mut() {
                    row.dependencies = match &row.cell_address {
                        Some(address) => resolve_dependencies_from_address(
                            sheet_name,
                            &row.formula_text,
                            address,
                        ),
                        None => Vec::new(),
                    };
                }
            }
        }
    }

    pub fn table_count(&self) -> usize {
        self.sheets.values().map(|s| s.tables.len()).sum()
    }

    pub fn row_count(&self) -> usize {
        self.sheets
            .values()
            .flat_map(|s| s.tables.values())
            .map(|t| t.rows.len())
            .sum()
    }
}

/// Detect tables and extract rows for a single sheet.
///
/// A sheet without headers yields an empty table map, never an error.
pub fn extract_sheet(sheet: &Sheet, config: &ExtractConfig) -> SheetMetadata {
    let index = sheet.index();
    if index.dropped() > 0 {
        debug!(
            "Sheet '{}': dropped {} cells without a position",
            sheet.name,
            index.dropped()
        );
    }

    let mut tables = BTreeMap::new();
    for region in detect_regions(&index, config) {
        let rows = extract_rows(&sheet.name, &region, &index, config);
        let name = disambiguate(&region.header.name, &tables);
        tables.insert(
            name,
            Table {
                origin: Some(CellRef::new(region.header.row, region.header.col)),
                row_count: region.height,
                column_count: region.width,
                rows,
            },
        );
    }

    debug!("Sheet '{}': {} tables", sheet.name, tables.len());
    SheetMetadata { tables }
}

/// Build the metadata tree for every sheet of a workbook.
pub fn extract_metadata(workbook: &Workbook, config: &ExtractConfig) -> Metadata {
    let mut metadata = Metadata::default();
    for sheet in &workbook.sheets {
        let extracted = extract_sheet(sheet, config);
        if metadata.sheets.insert(sheet.name.clone(), extracted).is_some() {
            warn!("Duplicate sheet name '{}': keeping the later sheet", sheet.name);
        }
    }
    info!(
        "Extracted {} tables with {} rows from {} sheets",
        metadata.table_count(),
        metadata.row_count(),
        metadata.sheets.len()
    );
    metadata
}

/// Both durable outputs of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Analysis {
    pub metadata: Metadata,
    pub graph: DependencyGraph,
}

/// Extract metadata for all sheets, then build the global dependency graph.
pub fn analyze(workbook: &Workbook, config: &ExtractConfig) -> Analysis {
    let metadata = extract_metadata(workbook, config);
    let graph = build_dependency_graph(&metadata);
    Analysis { metadata, graph }
}
