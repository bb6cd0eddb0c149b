use std::path::PathBuf;

use healthdays_transform::FrameError;
use healthdays_xpt::XptError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("failed to write XPT {path}: {source}")]
    Xpt {
        path: PathBuf,
        #[source]
        source: XptError,
    },

    #[error("failed to write JSON report {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("DataFrame error: {0}")]
    DataFrame(#[from] PolarsError),

    #[error("no records to write")]
    EmptyInput,
}

pub type Result<T> = std::result::Result<T, ReportError>;
