//! Reading dumps and metadata from disk, writing results back.

mod parser;
mod writer;

pub use parser::{read_metadata, read_workbook};
pub use writer::{DEPENDENCY_GRAPH_FILE, METADATA_FILE, to_json_string, write_analysis, write_json};
