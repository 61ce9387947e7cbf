//! Extraction settings.
//!
//! Every layout convention the detector relies on (header colours, reserved
//! header labels, which column holds a row's name or value) lives here so a
//! caller can describe a differently laid-out workbook without code changes.
//! Settings load from TOML; any omitted key keeps its default.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, SheetmetaError};
use crate::workbook::Cell;

/// A background/font colour pair, compared case-insensitively.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyle {
    pub background: String,
    pub font_color: String,
}

impl CellStyle {
    pub fn new(background: &str, font_color: &str) -> Self {
        CellStyle {
            background: background.to_string(),
            font_color: font_color.to_string(),
        }
    }

    /// True when both colours of `cell` are present and equal to this style's.
    pub fn matches(&self, cell: &Cell) -> bool {
        let same = |expected: &str, actual: Option<&str>| {
            actual.is_some_and(|actual| actual.eq_ignore_ascii_case(expected))
        };
        same(&self.background, cell.background.as_deref())
            && same(&self.font_color, cell.font_color.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Styling that marks a table header cell.
    pub header_style: CellStyle,
    /// Header labels that never start a table.
    pub ignored_headers: BTreeSet<String>,
    /// Column holding each row's name.
    pub label_column: usize,
    /// Column holding each row's auxiliary text.
    pub auxiliary_column: usize,
    /// Column holding each row's value formula, unless overridden per sheet.
    pub value_column: usize,
    pub value_column_overrides: BTreeMap<String, usize>,
    /// Styling of plain label cells, used by the styled label inventory.
    pub label_style: CellStyle,
    /// Per-sheet minimum column for the styled label inventory (default 0).
    pub label_min_column: BTreeMap<String, usize>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        ExtractConfig {
            header_style: CellStyle::new("#3366FF", "#FFFFFF"),
            ignored_headers: BTreeSet::from(["Scenario Chosen".to_string()]),
            label_column: 1,
            auxiliary_column: 2,
            value_column: 5,
            value_column_overrides: BTreeMap::from([("scenarios".to_string(), 3)]),
            label_style: CellStyle::new("#FFFFFF", "#000000"),
            label_min_column: BTreeMap::new(),
        }
    }
}

impl ExtractConfig {
    /// Value column for `sheet`, honouring per-sheet overrides.
    pub fn value_column_for(&self, sheet: &str) -> usize {
        self.value_column_overrides
            .get(sheet)
            .copied()
            .unwrap_or(self.value_column)
    }

    pub fn label_min_column_for(&self, sheet: &str) -> usize {
        self.label_min_column.get(sheet).copied().unwrap_or(0)
    }

    pub fn is_ignored_header(&self, label: &str) -> bool {
        self.ignored_headers.contains(label)
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|err| SheetmetaError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Location of the per-user config file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        let proj = ProjectDirs::from("io", "sheetmeta", "sheetmeta")?;
        let mut path = proj.config_dir().to_path_buf();
        path.push("config.toml");
        Some(path)
    }

    /// Pick the settings for a run.
    ///
    /// An explicit path must load. Otherwise the per-user file is used when
    /// `use_default_file` is set and the file exists; failing both, defaults.
    pub fn resolve(explicit: Option<&Path>, use_default_file: bool) -> Result<Self> {
        if let Some(path) = explicit {
            debug!("Loading config from {}", path.display());
            return Self::load(path);
        }
        if use_default_file {
            if let Some(path) = Self::default_path().filter(|p| p.is_file()) {
                debug!("Loading default config from {}", path.display());
                return Self::load(&path);
            }
        }
        Ok(Self::default())
    }
}
