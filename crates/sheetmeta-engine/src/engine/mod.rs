//! Reference engine API.
//!
//! Everything here is pure and synchronous:
//!
//! - [`CellRef`] - A1 addressing (row/col indices ↔ "B7")
//! - [`extract_references`], [`resolve_references`] - R1C1 reference parsing
//! - [`transitive_closure`] - Per-node flattening of a direct dependency graph

mod cell_ref;
mod closure;
mod r1c1;

pub use cell_ref::{CellRef, qualified_id};
pub use closure::{DependencyGraph, DirectGraph, reachable_from, transitive_closure};
pub use r1c1::{Axis, R1C1Ref, ResolvedRef, extract_references, resolve_references};
