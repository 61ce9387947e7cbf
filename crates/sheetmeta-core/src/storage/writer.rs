//! Writers for metadata and dependency graph JSON.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::metadata::Analysis;

pub const METADATA_FILE: &str = "metadata.json";
pub const DEPENDENCY_GRAPH_FILE: &str = "dependency_graph.json";

/// Pretty-printed JSON with a trailing newline.
pub fn to_json_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)? + "\n")
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    fs::write(path, to_json_string(value)?)?;
    Ok(())
}

/// Write `metadata.json` and `dependency_graph.json` into `dir`.
/// Returns the two paths written.
pub fn write_analysis(dir: &Path, analysis: &Analysis) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir)?;
    let metadata_path = dir.join(METADATA_FILE);
    let graph_path = dir.join(DEPENDENCY_GRAPH_FILE);
    write_json(&metadata_path, &analysis.metadata)?;
    write_json(&graph_path, &analysis.graph)?;
    info!("Wrote {} and {}", metadata_path.display(), graph_path.display());
    Ok((metadata_path, graph_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_json_string_is_sorted_and_terminated() {
        let mut graph: BTreeMap<String, Vec<String>> = BTreeMap::new();
        graph.insert("s!B1".to_string(), vec![]);
        graph.insert("s!A1".to_string(), vec!["s!B1".to_string()]);
        let content = to_json_string(&graph).unwrap();
        assert!(content.ends_with("}\n"));
        assert!(content.find("s!A1").unwrap() < content.find("\"s!B1\": []").unwrap());
    }
}
