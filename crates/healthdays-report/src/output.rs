//! Clean table output.
//!
//! The downstream extract format is a CSV whose factor columns hold numeric
//! codes. The same table can also be written with labels, or as a SAS
//! Transport file with every column numeric.

use std::fmt;
use std::fs::File;
use std::path::Path;

use healthdays_common::any_to_f64;
use healthdays_model::CleanRecord;
use healthdays_transform::frame::{DRINKING, GENERATION, HEALTHY_DAYS, SMOKING};
use healthdays_transform::{CleanFrame, CodingStyle};
use healthdays_xpt::{XptColumn, XptDataset, XptValue, XptWriterOptions, write_xpt};
use polars::prelude::*;
use tracing::info;

use crate::error::{ReportError, Result};

/// Member name of the XPT output.
pub const XPT_DATASET_NAME: &str = "HDAYS";

/// Table column to XPT variable name and label. V5 names are at most eight
/// characters.
const XPT_VARIABLES: [(&str, &str, &str); 4] = [
    (HEALTHY_DAYS, "HLTHDAYS", "Healthy days in past 30"),
    (GENERATION, "GENERATN", "Generation 0=Mill 1=GenX 2=Boomer"),
    (DRINKING, "DRINKING", "Drinking 0=None 1=Moderate 2=Heavy"),
    (SMOKING, "SMOKING", "Smoking 0=None 1=Some days 2=Every day"),
];

/// Output file formats for the clean table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// CSV with factor columns as numeric codes.
    #[default]
    CsvCodes,
    /// CSV with factor columns as labels.
    CsvLabels,
    /// SAS Transport V5 with factor columns as numeric codes.
    Xpt,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::CsvCodes => "csv-codes",
            OutputFormat::CsvLabels => "csv-labels",
            OutputFormat::Xpt => "xpt",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::CsvCodes | OutputFormat::CsvLabels => "csv",
            OutputFormat::Xpt => "xpt",
        }
    }

    pub fn coding(&self) -> CodingStyle {
        match self {
            OutputFormat::CsvLabels => CodingStyle::Labels,
            OutputFormat::CsvCodes | OutputFormat::Xpt => CodingStyle::Codes,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Writes recoded records to `path` in the requested format.
pub fn write_clean_table(path: &Path, records: &[CleanRecord], format: OutputFormat) -> Result<()> {
    if records.is_empty() {
        return Err(ReportError::EmptyInput);
    }

    let mut frame = CleanFrame::from_records(records, format.coding())?;
    match format {
        OutputFormat::CsvCodes | OutputFormat::CsvLabels => write_csv(path, &mut frame.data)?,
        OutputFormat::Xpt => {
            let dataset = build_xpt_dataset(&frame)?;
            write_xpt(path, &dataset, XptWriterOptions::default()).map_err(|source| {
                ReportError::Xpt {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        }
    }

    info!(
        path = %path.display(),
        format = %format,
        rows = frame.record_count(),
        "output written"
    );
    Ok(())
}

fn write_csv(path: &Path, df: &mut DataFrame) -> Result<()> {
    let mut file = File::create(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .map_err(|source| ReportError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

/// Renders a frame as CSV text.
pub fn render_csv(frame: &CleanFrame) -> Result<String> {
    let mut buffer = Vec::new();
    let mut df = frame.data.clone();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(&mut df)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Builds the XPT member from a code-style frame.
pub fn build_xpt_dataset(frame: &CleanFrame) -> Result<XptDataset> {
    let frame = if frame.style == CodingStyle::Codes {
        frame.clone()
    } else {
        frame.clone().into_codes()?
    };
    let df = &frame.data;

    let columns = XPT_VARIABLES
        .iter()
        .map(|(_, name, label)| XptColumn::numeric(*name).with_label(*label))
        .collect();
    let mut dataset =
        XptDataset::with_columns(XPT_DATASET_NAME, columns).with_label("Recoded healthy days");

    let series = XPT_VARIABLES
        .iter()
        .map(|(column, _, _)| df.column(column))
        .collect::<PolarsResult<Vec<_>>>()?;

    dataset.rows = (0..df.height())
        .map(|row_idx| {
            series
                .iter()
                .map(|column| {
                    let value = column.get(row_idx)?;
                    Ok(any_to_f64(value)
                        .map_or_else(XptValue::numeric_missing, XptValue::numeric))
                })
                .collect::<PolarsResult<Vec<_>>>()
        })
        .collect::<PolarsResult<Vec<_>>>()?;
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthdays_model::{DrinkingCategory, Generation, SmokingCategory};

    fn records() -> Vec<CleanRecord> {
        vec![
            CleanRecord {
                row: 0,
                healthy_days: 30,
                generation: Generation::Millennial,
                drinking: DrinkingCategory::Heavy,
                smoking: SmokingCategory::EveryDay,
            },
            CleanRecord {
                row: 1,
                healthy_days: 26,
                generation: Generation::GenerationX,
                drinking: DrinkingCategory::None,
                smoking: SmokingCategory::None,
            },
            CleanRecord {
                row: 2,
                healthy_days: 0,
                generation: Generation::BabyBoomer,
                drinking: DrinkingCategory::Moderate,
                smoking: SmokingCategory::SomeDays,
            },
        ]
    }

    #[test]
    fn coded_csv() {
        let frame = CleanFrame::from_records(&records(), CodingStyle::Codes).unwrap();
        insta::assert_snapshot!(render_csv(&frame).unwrap().trim_end(), @r"
        healthy_days,generation,drinking,smoking
        30,0,2,2
        26,1,0,0
        0,2,1,1
        ");
    }

    #[test]
    fn labelled_csv_header() {
        let frame = CleanFrame::from_records(&records(), CodingStyle::Labels).unwrap();
        let csv = render_csv(&frame).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("healthy_days,generation,drinking,smoking"));
        assert_eq!(lines.next(), Some("30,Millennial,Heavy,EveryDay"));
    }

    #[test]
    fn xpt_dataset_from_labels() {
        let frame = CleanFrame::from_records(&records(), CodingStyle::Labels).unwrap();
        let dataset = build_xpt_dataset(&frame).unwrap();
        assert_eq!(dataset.name, XPT_DATASET_NAME);
        assert_eq!(dataset.num_rows(), 3);
        assert_eq!(dataset.num_columns(), 4);
        let generation = dataset.column_index("GENERATN").unwrap();
        assert_eq!(dataset.rows[2][generation].as_f64(), Some(2.0));
    }

    #[test]
    fn xpt_dataset_nulls_become_missing() {
        let data = DataFrame::new(vec![
            Series::new(HEALTHY_DAYS.into(), [Some(30i32), Some(12)]).into(),
            Series::new(GENERATION.into(), [Some(0i32), None]).into(),
            Series::new(DRINKING.into(), [Some(2i32), Some(1)]).into(),
            Series::new(SMOKING.into(), [None, Some(0i32)]).into(),
        ])
        .unwrap();
        let frame = CleanFrame {
            data,
            style: CodingStyle::Codes,
            source_rows: vec![0, 1],
        };
        let dataset = build_xpt_dataset(&frame).unwrap();
        assert_eq!(
            dataset.rows,
            vec![
                vec![
                    XptValue::numeric(30.0),
                    XptValue::numeric(0.0),
                    XptValue::numeric(2.0),
                    XptValue::numeric_missing(),
                ],
                vec![
                    XptValue::numeric(12.0),
                    XptValue::numeric_missing(),
                    XptValue::numeric(1.0),
                    XptValue::numeric(0.0),
                ],
            ]
        );
    }

    #[test]
    fn xpt_dataset_requires_every_column() {
        let data = DataFrame::new(vec![
            Series::new(HEALTHY_DAYS.into(), [30i32]).into(),
            Series::new(GENERATION.into(), [0i32]).into(),
        ])
        .unwrap();
        let frame = CleanFrame {
            data,
            style: CodingStyle::Codes,
            source_rows: vec![0],
        };
        assert!(matches!(
            build_xpt_dataset(&frame),
            Err(ReportError::DataFrame(_))
        ));
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = write_clean_table(Path::new("unused.csv"), &[], OutputFormat::CsvCodes)
            .unwrap_err();
        assert!(matches!(err, ReportError::EmptyInput));
    }

    #[test]
    fn format_metadata() {
        assert_eq!(OutputFormat::default(), OutputFormat::CsvCodes);
        assert_eq!(OutputFormat::CsvLabels.extension(), "csv");
        assert_eq!(OutputFormat::Xpt.coding(), CodingStyle::Codes);
        assert_eq!(OutputFormat::CsvLabels.to_string(), "csv-labels");
    }
}
