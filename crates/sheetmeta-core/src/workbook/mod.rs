//! In-memory view of a workbook cell dump.
//!
//! The dump is produced by an external loader. Two shapes are accepted:
//!
//! ```text
//! { "worksheets": [ { "name": "debt", "cells": { "k": { ...cell } } } ] }
//! { "debt": { "cells": { "k": { ...cell } } } }
//! ```
//!
//! where each cell carries `rowIndex`, `columnIndex`, `formulaR1C1` and
//! `format: { backgroundColor, font: { color } }`. Any of those may be
//! missing; cells without a position are kept here and dropped by
//! [`CellIndex`]. Records that are not objects are skipped. Sheets and
//! keyed cells keep their dump order.

mod index;

pub use index::CellIndex;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::{Result, SheetmetaError};

/// One record of the dump. Read-only once built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub row: Option<usize>,
    pub col: Option<usize>,
    /// Raw formula or value text (`formulaR1C1`).
    pub text: Option<String>,
    pub background: Option<String>,
    pub font_color: Option<String>,
}

impl Cell {
    pub fn new(row: usize, col: usize, text: &str) -> Self {
        Cell {
            row: Some(row),
            col: Some(col),
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    pub fn with_style(mut self, background: &str, font_color: &str) -> Self {
        self.background = Some(background.to_string());
        self.font_color = Some(font_color.to_string());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Sheet {
    pub fn new(name: &str, cells: Vec<Cell>) -> Self {
        Sheet {
            name: name.to_string(),
            cells,
        }
    }

    /// Build a fresh lookup index over this sheet's cells.
    pub fn index(&self) -> CellIndex<'_> {
        CellIndex::build(&self.cells)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Workbook {
    /// Sheets in dump order.
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Workbook { sheets }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Names of all sheets, in dump order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: Value) -> Result<Self> {
        let Value::Object(mut top) = value else {
            return Err(SheetmetaError::InvalidWorkbook(
                "top level must be a JSON object".to_string(),
            ));
        };

        let listed = top
            .get_mut("worksheets")
            .filter(|v| v.is_array())
            .map(Value::take);
        if let Some(Value::Array(worksheets)) = listed {
            let mut sheets = Vec::with_capacity(worksheets.len());
            for (i, ws) in worksheets.into_iter().enumerate() {
                let raw: RawWorksheet = match serde_json::from_value(ws) {
                    Ok(raw) => raw,
                    Err(e) => {
                        warn!("Skipping worksheet #{}: {}", i, e);
                        continue;
                    }
                };
                // Unnamed worksheets cannot be addressed by formulas.
                let Some(name) = raw.name.as_ref().and_then(Value::as_str).filter(|n| !n.is_empty())
                else {
                    continue;
                };
                sheets.push(Sheet::new(name, parse_cells(name, raw.cells)));
            }
            return Ok(Workbook::new(sheets));
        }

        let mut sheets = Vec::with_capacity(top.len());
        for (name, body) in top {
            let raw: RawSheetBody = match serde_json::from_value(body) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Skipping sheet '{}': {}", name, e);
                    continue;
                }
            };
            let cells = parse_cells(&name, raw.cells);
            sheets.push(Sheet::new(&name, cells));
        }
        Ok(Workbook::new(sheets))
    }
}

#[derive(Deserialize)]
struct RawWorksheet {
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    cells: Value,
}

#[derive(Deserialize)]
struct RawSheetBody {
    #[serde(default)]
    cells: Value,
}

#[derive(Deserialize)]
struct RawCell {
    #[serde(rename = "rowIndex", default)]
    row_index: Option<Value>,
    #[serde(rename = "columnIndex", default)]
    column_index: Option<Value>,
    #[serde(rename = "formulaR1C1", default)]
    formula: Option<Value>,
    #[serde(default)]
    format: Option<Value>,
}

impl RawCell {
    fn into_cell(self) -> Cell {
        let format = self.format.as_ref();
        let colour = |pointer: &str| {
            format
                .and_then(|f| f.pointer(pointer))
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        Cell {
            row: self.row_index.as_ref().and_then(position),
            col: self.column_index.as_ref().and_then(position),
            text: self.formula.as_ref().and_then(scalar_text),
            background: colour("/backgroundColor"),
            font_color: colour("/font/color"),
        }
    }
}

/// Cell records of one sheet, keyed or listed, in dump order.
///
/// Records that are not JSON objects are skipped.
fn parse_cells(sheet: &str, cells: Value) -> Vec<Cell> {
    let records: Vec<Value> = match cells {
        Value::Object(keyed) => keyed.into_iter().map(|(_, record)| record).collect(),
        Value::Array(listed) => listed,
        Value::Null => Vec::new(),
        other => {
            warn!("Sheet '{}': ignoring cells of unexpected type: {}", sheet, other);
            return Vec::new();
        }
    };

    let mut malformed = 0;
    let parsed: Vec<Cell> = records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<RawCell>(record) {
            Ok(raw) => Some(raw.into_cell()),
            Err(e) => {
                trace!("Sheet '{}': malformed cell record: {}", sheet, e);
                malformed += 1;
                None
            }
        })
        .collect();
    if malformed > 0 {
        debug!("Sheet '{}': skipped {} malformed cell records", sheet, malformed);
    }
    parsed
}

/// Row and column indices above `i64::MAX` cannot take part in R1C1
/// arithmetic and count as missing.
fn position(value: &Value) -> Option<usize> {
    value
        .as_u64()
        .filter(|n| i64::try_from(*n).is_ok())
        .and_then(|n| usize::try_from(n).ok())
}

/// Render a scalar cell value as text; arrays and objects carry no text.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
