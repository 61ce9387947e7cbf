//! Global dependency graph over every extracted row.
//!
//! Nodes are `Sheet!A1` ids of row value cells. The direct graph holds each
//! node's formula operands; the published graph flattens that into the full,
//! sorted set of cells each node depends on, across sheets.

use tracing::{info, warn};

use sheetmeta_engine::engine::{DependencyGraph, DirectGraph, transitive_closure};

use crate::metadata::Metadata;

/// Direct edges for every row that has a value cell.
///
/// Rows without an address are not nodes. If two rows resolve to the same
/// cell, their edges are merged in encounter order.
pub fn build_direct_graph(metadata: &Metadata) -> DirectGraph {
    let mut graph = DirectGraph::new();
    for (sheet_name, sheet) in &metadata.sheets {
        for table in sheet.tables.values() {
            for row in table.rows.values() {
                let Some(address) = &row.cell_address else {
                    continue;
                };
                let edges = graph.entry(format!("{}!{}", sheet_name, address)).or_default();
                for dep in &row.dependencies {
                    let id = dep.qualified_id();
                    if !edges.contains(&id) {
                        edges.push(id);
                    }
                }
            }
        }
    }
    graph
}

/// The transitive dependency graph of all rows in `metadata`.
pub fn build_dependency_graph(metadata: &Metadata) -> DependencyGraph {
    let direct = build_direct_graph(metadata);
    let graph = transitive_closure(&direct);

    let cyclic: Vec<&String> = graph
        .iter()
        .filter(|(node, deps)| deps.binary_search(*node).is_ok())
        .map(|(node, _)| node)
        .collect();
    if !cyclic.is_empty() {
        warn!(
            "{} cells depend on themselves through a reference cycle (first: {})",
            cyclic.len(),
            cyclic[0]
        );
    }

    info!(
        "Dependency graph: {} nodes, {} direct edges",
        graph.len(),
        direct.values().map(Vec::len).sum::<usize>()
    );
    graph
}
