//! SAS Transport input.

use std::path::Path;

use healthdays_xpt::{XptDataset, XptReader, XptReaderOptions, XptType, XptValue};
use polars::prelude::*;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Reads an XPT file into a DataFrame, decoding only `wanted` variables
/// (matched case-insensitively) when given.
pub fn read_xpt_frame(path: &Path, wanted: Option<&[String]>) -> Result<DataFrame> {
    let xpt_error = |source| IngestError::Xpt {
        path: path.to_path_buf(),
        source,
    };
    let mut options = XptReaderOptions::default();
    if let Some(wanted) = wanted {
        options = options.with_columns(wanted.iter().cloned());
    }
    let dataset = XptReader::open_with_options(path, options)
        .and_then(XptReader::read_dataset)
        .map_err(xpt_error)?;
    debug!(
        path = %path.display(),
        member = %dataset.name,
        created = ?dataset.created,
        columns = dataset.num_columns(),
        "xpt member read"
    );
    dataset_to_frame(&dataset)
}

/// Converts a transport dataset to a DataFrame.
///
/// Numeric variables become `Float64` and character variables `String`.
/// SAS missing values and blank strings become nulls.
pub fn dataset_to_frame(dataset: &XptDataset) -> Result<DataFrame> {
    let columns: Vec<Column> = dataset
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let name: PlSmallStr = column.name.as_str().into();
            let values = dataset.column_values(idx);
            match column.data_type {
                XptType::Num => {
                    let data: Vec<Option<f64>> =
                        values.map(|v| v.and_then(XptValue::as_f64)).collect();
                    Series::new(name, data).into()
                }
                XptType::Char => {
                    let data: Vec<Option<&str>> = values
                        .map(|v| v.and_then(XptValue::as_str).filter(|s| !s.trim().is_empty()))
                        .collect();
                    Series::new(name, data).into()
                }
            }
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}
