//! Readers for workbook dumps and previously written metadata.

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::metadata::Metadata;
use crate::workbook::Workbook;

/// Read a workbook dump (JSON) produced by the loader.
pub fn read_workbook(path: &Path) -> Result<Workbook> {
    let content = fs::read_to_string(path)?;
    let workbook = Workbook::from_json_str(&content)?;
    debug!("Read {} sheets from {}", workbook.sheets.len(), path.display());
    Ok(workbook)
}

/// Read a metadata tree written by [`super::write_analysis`].
pub fn read_metadata(path: &Path) -> Result<Metadata> {
    let content = fs::read_to_string(path)?;
    Metadata::from_json_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SheetmetaError;

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_workbook(Path::new("/nonexistent/sheetmeta/dump.json")).unwrap_err();
        assert!(matches!(err, SheetmetaError::Io(_)));
    }
}
