//! Clean table as a Polars DataFrame.
//!
//! This module provides [`CleanFrame`], which wraps the recoded records as a
//! DataFrame with one integer outcome column and three factor columns. The
//! factors are held either as labels or as numeric codes, see
//! [`CodingStyle`].

use healthdays_model::{CleanRecord, DrinkingCategory, Generation, SmokingCategory};
use polars::prelude::*;
use thiserror::Error;

pub const HEALTHY_DAYS: &str = "healthy_days";
pub const GENERATION: &str = "generation";
pub const DRINKING: &str = "drinking";
pub const SMOKING: &str = "smoking";

/// Factor columns in output order.
pub const FACTOR_COLUMNS: [&str; 3] = [GENERATION, DRINKING, SMOKING];

/// How factor columns are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodingStyle {
    /// `String` labels such as `GenerationX` or `EveryDay`.
    #[default]
    Labels,
    /// `Int32` codes 0, 1, 2 in category declaration order.
    Codes,
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("failed to build clean table: {0}")]
    DataFrame(#[from] PolarsError),

    #[error("column {column} row {row}: {value:?} is not a known category")]
    UnknownLabel {
        column: &'static str,
        row: usize,
        value: Option<String>,
    },
}

/// The analysis-ready table.
///
/// # Fields
///
/// - `data`: columns `healthy_days` (Int32) then `generation`, `drinking`,
///   `smoking`
/// - `style`: whether the factor columns are labels or codes
/// - `source_rows`: source row of each table row, for tracing a value back
///   to the extract
#[derive(Debug, Clone)]
pub struct CleanFrame {
    pub data: DataFrame,
    pub style: CodingStyle,
    pub source_rows: Vec<usize>,
}

impl CleanFrame {
    /// Builds the table from recoded records, keeping their order.
    pub fn from_records(records: &[CleanRecord], style: CodingStyle) -> Result<Self, FrameError> {
        let healthy: Vec<i32> = records.iter().map(|r| i32::from(r.healthy_days)).collect();

        let factors: [Column; 3] = match style {
            CodingStyle::Labels => [
                label_column(GENERATION, records.iter().map(|r| r.generation.as_str())),
                label_column(DRINKING, records.iter().map(|r| r.drinking.as_str())),
                label_column(SMOKING, records.iter().map(|r| r.smoking.as_str())),
            ],
            CodingStyle::Codes => [
                code_column(GENERATION, records.iter().map(|r| r.generation.code())),
                code_column(DRINKING, records.iter().map(|r| r.drinking.code())),
                code_column(SMOKING, records.iter().map(|r| r.smoking.code())),
            ],
        };

        let mut columns: Vec<Column> = vec![Series::new(HEALTHY_DAYS.into(), healthy).into()];
        columns.extend(factors);

        Ok(Self {
            data: DataFrame::new(columns)?,
            style,
            source_rows: records.iter().map(|r| r.row).collect(),
        })
    }

    /// Returns the number of records in the frame.
    pub fn record_count(&self) -> usize {
        self.data.height()
    }

    /// Replaces label columns with their numeric codes.
    ///
    /// A frame that already holds codes is returned unchanged.
    pub fn into_codes(mut self) -> Result<Self, FrameError> {
        if self.style == CodingStyle::Codes {
            return Ok(self);
        }

        for name in FACTOR_COLUMNS {
            let codes = {
                let labels = self.data.column(name)?.str()?;
                labels
                    .into_iter()
                    .enumerate()
                    .map(|(row, label)| {
                        label
                            .and_then(|label| code_for_label(name, label))
                            .map(i32::from)
                            .ok_or_else(|| FrameError::UnknownLabel {
                                column: name,
                                row,
                                value: label.map(str::to_string),
                            })
                    })
                    .collect::<Result<Vec<i32>, FrameError>>()?
            };
            self.data.with_column(Series::new(name.into(), codes))?;
        }

        self.style = CodingStyle::Codes;
        Ok(self)
    }
}

fn label_column<'a>(name: &str, labels: impl Iterator<Item = &'a str>) -> Column {
    Series::new(name.into(), labels.collect::<Vec<_>>()).into()
}

fn code_column(name: &str, codes: impl Iterator<Item = u8>) -> Column {
    Series::new(name.into(), codes.map(i32::from).collect::<Vec<_>>()).into()
}

fn code_for_label(column: &str, label: &str) -> Option<u8> {
    match column {
        GENERATION => label.parse::<Generation>().ok().map(|g| g.code()),
        DRINKING => label.parse::<DrinkingCategory>().ok().map(|d| d.code()),
        SMOKING => label.parse::<SmokingCategory>().ok().map(|s| s.code()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<CleanRecord> {
        vec![
            CleanRecord {
                row: 2,
                healthy_days: 30,
                generation: Generation::Millennial,
                drinking: DrinkingCategory::Heavy,
                smoking: SmokingCategory::None,
            },
            CleanRecord {
                row: 5,
                healthy_days: 12,
                generation: Generation::BabyBoomer,
                drinking: DrinkingCategory::None,
                smoking: SmokingCategory::EveryDay,
            },
        ]
    }

    #[test]
    fn label_frame_layout() {
        let frame = CleanFrame::from_records(&records(), CodingStyle::Labels).unwrap();
        assert_eq!(frame.record_count(), 2);
        let names: Vec<&str> = frame
            .data
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect();
        assert_eq!(names, vec!["healthy_days", "generation", "drinking", "smoking"]);
        assert_eq!(frame.data.column(HEALTHY_DAYS).unwrap().dtype(), &DataType::Int32);
        assert_eq!(frame.data.column(SMOKING).unwrap().dtype(), &DataType::String);
        assert_eq!(frame.source_rows, vec![2, 5]);

        let generation = frame.data.column(GENERATION).unwrap().str().unwrap();
        assert_eq!(generation.get(1), Some("BabyBoomer"));
    }

    #[test]
    fn codes_follow_category_order() {
        let frame = CleanFrame::from_records(&records(), CodingStyle::Codes).unwrap();
        let drinking = frame.data.column(DRINKING).unwrap().i32().unwrap();
        assert_eq!(drinking.get(0), Some(2));
        assert_eq!(drinking.get(1), Some(0));
        let smoking = frame.data.column(SMOKING).unwrap().i32().unwrap();
        assert_eq!(smoking.get(1), Some(2));
    }

    #[test]
    fn into_codes_matches_direct_codes() {
        let converted = CleanFrame::from_records(&records(), CodingStyle::Labels)
            .unwrap()
            .into_codes()
            .unwrap();
        let direct = CleanFrame::from_records(&records(), CodingStyle::Codes).unwrap();
        assert_eq!(converted.style, CodingStyle::Codes);
        assert!(converted.data.equals(&direct.data));
    }

    #[test]
    fn into_codes_rejects_unknown_label() {
        let data = DataFrame::new(vec![
            Series::new(HEALTHY_DAYS.into(), vec![3i32]).into(),
            Series::new(GENERATION.into(), vec!["Silent"]).into(),
            Series::new(DRINKING.into(), vec!["None"]).into(),
            Series::new(SMOKING.into(), vec!["None"]).into(),
        ])
        .unwrap();
        let frame = CleanFrame {
            data,
            style: CodingStyle::Labels,
            source_rows: vec![0],
        };
        let err = frame.into_codes().unwrap_err();
        assert!(matches!(
            err,
            FrameError::UnknownLabel {
                column: GENERATION,
                row: 0,
                ..
            }
        ));
    }

    #[test]
    fn empty_records_make_empty_frame() {
        let frame = CleanFrame::from_records(&[], CodingStyle::Codes).unwrap();
        assert_eq!(frame.record_count(), 0);
        assert_eq!(frame.data.width(), 4);
    }
}
