//! Transitive closure over a direct dependency graph.
//!
//! Each node's published list is every node reachable from it by following
//! direct edges one or more times. Traversal is a depth-first walk with an
//! explicit stack, so deep reference chains cannot overflow the call stack,
//! and each root owns its visited set.

use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Direct edges: node id -> ids it references, in formula order.
pub type DirectGraph = BTreeMap<String, Vec<String>>;

/// Flattened edges: node id -> sorted, duplicate-free transitive dependencies.
pub type DependencyGraph = BTreeMap<String, Vec<String>>;

/// Compute the transitive dependency list of every node in `direct`.
pub fn transitive_closure(direct: &DirectGraph) -> DependencyGraph {
    direct
        .keys()
        .map(|node| (node.clone(), reachable_from(node, direct)))
        .collect()
}

/// Every id reachable from `root`, sorted and deduplicated.
///
/// Ids with no entry in `direct` are reported but not expanded. A node met
/// again during the same walk is not re-expanded; its edges were recorded the
/// first time it was expanded.
pub fn reachable_from(root: &str, direct: &DirectGraph) -> Vec<String> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut found: BTreeSet<&str> = BTreeSet::new();
    let mut stack: Vec<&str> = vec![root];

    while let Some(node) = stack.pop() {
        if !visited.insert(node) {
            continue;
        }
        let Some(edges) = direct.get(node) else {
            continue;
        };
        for dep in edges.iter().rev() {
            found.insert(dep.as_str());
            if !visited.contains(dep.as_str()) {
                stack.push(dep.as_str());
            }
        }
    }

    found.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &[&str])]) -> DirectGraph {
        edges
            .iter()
            .map(|(node, deps)| {
                (node.to_string(), deps.iter().map(|d| d.to_string()).collect())
            })
            .collect()
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_chain_is_flattened() {
        let direct = graph(&[("S!A1", &["S!B1"]), ("S!B1", &["S!C1"]), ("S!C1", &[])]);
        let closure = transitive_closure(&direct);
        assert_eq!(closure["S!A1"], ids(&["S!B1", "S!C1"]));
        assert_eq!(closure["S!B1"], ids(&["S!C1"]));
        assert!(closure["S!C1"].is_empty());
    }

    #[test]
    fn test_diamond_reports_shared_descendant_once() {
        let direct = graph(&[
            ("S!A1", &["S!B1", "S!C1"]),
            ("S!B1", &["S!D1"]),
            ("S!C1", &["S!D1"]),
            ("S!D1", &["S!E1"]),
        ]);
        let closure = transitive_closure(&direct);
        assert_eq!(closure["S!A1"], ids(&["S!B1", "S!C1", "S!D1", "S!E1"]));
    }

    #[test]
    fn test_cycle_terminates() {
        let direct = graph(&[("S!A1", &["S!B1"]), ("S!B1", &["S!A1"])]);
        let closure = transitive_closure(&direct);
        assert_eq!(closure["S!A1"], ids(&["S!A1", "S!B1"]));
        assert_eq!(closure["S!B1"], ids(&["S!A1", "S!B1"]));
    }

    #[test]
    fn test_self_reference() {
        let direct = graph(&[("S!A1", &["S!A1", "S!B1"])]);
        assert_eq!(reachable_from("S!A1", &direct), ids(&["S!A1", "S!B1"]));
    }

    #[test]
    fn test_dangling_reference_is_kept_but_not_expanded() {
        let direct = graph(&[("S!A1", &["Other!Z9"])]);
        let closure = transitive_closure(&direct);
        assert_eq!(closure["S!A1"], ids(&["Other!Z9"]));
        assert!(!closure.contains_key("Other!Z9"));
    }

    #[test]
    fn test_duplicate_direct_edges_are_collapsed() {
        let direct = graph(&[("S!A1", &["S!B1", "S!B1"]), ("S!B1", &[])]);
        assert_eq!(reachable_from("S!A1", &direct), ids(&["S!B1"]));
    }

    #[test]
    fn test_result_independent_of_edge_order() {
        let forward = graph(&[("S!A1", &["S!C1", "S!B1"]), ("S!B1", &["S!D1"]), ("S!C1", &[])]);
        let backward = graph(&[("S!A1", &["S!B1", "S!C1"]), ("S!C1", &[]), ("S!B1", &["S!D1"])]);
        assert_eq!(transitive_closure(&forward), transitive_closure(&backward));
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let depth = 100_000;
        let mut direct = DirectGraph::new();
        for i in 0..depth {
            direct.insert(format!("S!A{}", i), vec![format!("S!A{}", i + 1)]);
        }
        let deps = reachable_from("S!A0", &direct);
        assert_eq!(deps.len(), depth);
    }
}
