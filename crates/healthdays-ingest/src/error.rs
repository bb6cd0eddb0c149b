//! Error types for survey ingestion.

use std::path::PathBuf;

use healthdays_common::CodeError;
use healthdays_model::SurveyField;
use healthdays_xpt::XptError;
use thiserror::Error;

/// Errors that can occur while loading a survey extract.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported input format '{extension}' for {path} (expected .csv or .xpt)")]
    UnsupportedFormat { path: PathBuf, extension: String },

    // === Parsing Errors ===
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    #[error("failed to read SAS transport file {path}: {source}")]
    Xpt {
        path: PathBuf,
        #[source]
        source: XptError,
    },

    // === Record Extraction Errors ===
    #[error("column '{column}' for {field} not found in input")]
    MissingColumn { column: String, field: SurveyField },

    #[error("row {row}, column '{column}': {source}")]
    InvalidCode {
        row: usize,
        column: String,
        #[source]
        source: CodeError,
    },

    // === DataFrame Errors ===
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
