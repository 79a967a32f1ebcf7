//! Errors for the fallible edges of the tool: reading exports, installing the
//! dataset, and writing results. Aggregation itself never fails.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no header row containing '{column}' found in {path}")]
    MissingHeader { path: String, column: &'static str },

    #[error("unrecognized invitation direction: '{0}'")]
    UnrecognizedDirection(String),

    #[error("dataset has already been loaded for this process")]
    DatasetAlreadyLoaded,
}

pub type Result<T> = std::result::Result<T, ReportError>;
