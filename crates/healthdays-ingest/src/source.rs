//! Input format detection and loading.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use healthdays_model::ColumnMap;
use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{IngestError, Result};
use crate::xpt::read_xpt_frame;

/// Supported survey extract formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Xpt,
}

impl SourceFormat {
    /// Detects the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "xpt" => Ok(SourceFormat::Xpt),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: extension.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Csv => "csv",
            SourceFormat::Xpt => "xpt",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loads the mapped columns of a survey extract into a DataFrame, choosing
/// the reader by extension.
///
/// Columns outside `columns` are never decoded. A mapped column the file
/// lacks is left for [`resolve_columns`](crate::resolve_columns) to report.
pub fn load_survey(path: &Path, columns: &ColumnMap) -> Result<(DataFrame, SourceFormat)> {
    let format = SourceFormat::from_path(path)?;
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let wanted: Vec<String> = columns.iter().map(|(_, name)| name.to_string()).collect();
    let df = match format {
        SourceFormat::Csv => read_csv_frame(path, Some(&wanted))?,
        SourceFormat::Xpt => read_xpt_frame(path, Some(&wanted))?,
    };

    info!(
        path = %path.display(),
        format = %format,
        rows = df.height(),
        columns = df.width(),
        "survey loaded"
    );
    Ok((df, format))
}

/// Reads a CSV file with a single header row, keeping only `wanted` columns
/// (matched case-insensitively) when given.
///
/// Blank cells become nulls, which is how an unanswered question is
/// represented.
pub fn read_csv_frame(path: &Path, wanted: Option<&[String]>) -> Result<DataFrame> {
    let csv_error = |e: PolarsError| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let projection = match wanted {
        Some(wanted) => {
            let header = read_csv_header(path)?;
            let selected = select_header_columns(&header, wanted);
            if selected.is_empty() {
                warn!(
                    path = %path.display(),
                    "no mapped columns found in csv header, reading all columns"
                );
                None
            } else {
                Some(selected)
            }
        }
        None => None,
    };

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .with_columns(projection.map(|names| names.into_iter().map(PlSmallStr::from).collect()))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(csv_error)?
        .finish()
        .map_err(csv_error)?;

    debug!(
        path = %path.display(),
        columns = ?df.get_column_names(),
        "csv schema inferred"
    );
    Ok(df)
}

/// Column names from the first line of a CSV file.
fn read_csv_header(path: &Path) -> Result<Vec<String>> {
    let read_error = |source: std::io::Error| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    };
    let mut line = String::new();
    BufReader::new(File::open(path).map_err(read_error)?)
        .read_line(&mut line)
        .map_err(read_error)?;
    Ok(line
        .trim_start_matches('\u{feff}')
        .trim_end_matches(['\r', '\n'])
        .split(',')
        .map(|name| name.trim().trim_matches('"').to_string())
        .collect())
}

/// Header names matching any of `wanted`, in header order.
fn select_header_columns(header: &[String], wanted: &[String]) -> Vec<String> {
    header
        .iter()
        .filter(|name| {
            wanted
                .iter()
                .any(|candidate| candidate.trim().eq_ignore_ascii_case(name))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            SourceFormat::from_path(Path::new("LLCP2020.XPT")).unwrap(),
            SourceFormat::Xpt
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("extract.csv")).unwrap(),
            SourceFormat::Csv
        );
        assert!(matches!(
            SourceFormat::from_path(Path::new("extract.sas7bdat")),
            Err(IngestError::UnsupportedFormat { .. })
        ));
        assert!(SourceFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_select_header_columns() {
        let header: Vec<String> = ["_STATE", "physhlth", "AVEDRNK2", "SEQNO"]
            .map(String::from)
            .to_vec();
        let wanted: Vec<String> = ["AVEDRNK2", "PHYSHLTH", "ALCDAY5"]
            .map(String::from)
            .to_vec();
        assert_eq!(select_header_columns(&header, &wanted), ["physhlth", "AVEDRNK2"]);
        assert!(select_header_columns(&header, &[]).is_empty());
    }
}
