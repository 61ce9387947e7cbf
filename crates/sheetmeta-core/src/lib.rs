//! sheetmeta-core - Workbook model, table detection and dependency graph.
//!
//! The pipeline runs strictly forward:
//!
//! 1. [`Workbook`] holds the raw cell dump, one [`Sheet`] at a time indexed by
//!    [`CellIndex`].
//! 2. [`metadata`] detects styled header cells, infers table extents and
//!    extracts the named rows of each table.
//! 3. [`graph`] turns every row's formula references into a global,
//!    transitive dependency graph.

pub mod config;
pub mod error;
pub mod graph;
pub mod metadata;
pub mod storage;
pub mod terms;
pub mod workbook;

pub use config::{CellStyle, ExtractConfig};
pub use error::{Result, SheetmetaError};
pub use graph::{build_dependency_graph, build_direct_graph};
pub use metadata::{
    Analysis, DependencyRef, Metadata, RowEntry, SheetMetadata, Table, analyze, extract_metadata,
};
pub use workbook::{Cell, CellIndex, Sheet, Workbook};

pub use sheetmeta_engine::engine::{CellRef, DependencyGraph, DirectGraph};
