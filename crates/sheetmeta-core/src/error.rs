//! Error types for sheetmeta core.
//!
//! Only the edges (reading dumps, reading config, writing output) can fail.
//! Table detection and graph construction degrade instead of erroring.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading input or writing results
#[derive(Error, Debug)]
pub enum SheetmetaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Unrecognised workbook dump: {0}")]
    InvalidWorkbook(String),
}

pub type Result<T> = std::result::Result<T, SheetmetaError>;
