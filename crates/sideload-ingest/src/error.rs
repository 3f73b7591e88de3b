//! Ingestion error types.

use std::path::PathBuf;

use sideload_client::ClientError;
use thiserror::Error;

/// Errors reading or validating the input table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The file ended before the header row.
    #[error("table has no header row")]
    Empty,

    #[error("table is missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("data column {index} has a blank header")]
    BlankHeader { index: usize },

    #[error("header '{header}' appears more than once")]
    DuplicateHeader { header: String },
}

/// Errors mapping foreign-key names to identifiers. Fatal for the record
/// that carries the name.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("failed to fetch '{endpoint}' entities: {source}")]
    Fetch {
        endpoint: String,
        source: ClientError,
    },

    #[error("failed to create '{name}' at '{endpoint}': {source}")]
    Create {
        endpoint: String,
        name: String,
        source: ClientError,
    },

    /// The name was looked up or created earlier in the run and that failed.
    #[error("'{name}' in column '{header}' could not be resolved: {reason}")]
    Unresolved {
        header: String,
        name: String,
        reason: String,
    },

    /// A record carries a name that was not part of the resolution plan.
    #[error("'{name}' in column '{header}' was never resolved")]
    Unplanned { header: String, name: String },
}

/// A record dropped from the run because one of its names did not resolve.
#[derive(Debug, Error)]
#[error("record {record}: {source}")]
pub struct RecordError {
    /// 1-based position among the table's data rows.
    pub record: usize,
    pub name: Option<String>,
    pub paths: Vec<PathBuf>,
    pub source: ResolutionError,
}
