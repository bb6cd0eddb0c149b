//! Raw record extraction from a loaded survey frame.

use healthdays_common::{CaseInsensitiveSet, any_to_code};
use healthdays_model::{ColumnMap, RawRecord, SurveyField};
use polars::prelude::*;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Resolves each survey field to its actual column name in `df`.
///
/// Lookup ignores case, so `physhlth` matches `PHYSHLTH`.
pub fn resolve_columns(df: &DataFrame, columns: &ColumnMap) -> Result<Vec<(SurveyField, String)>> {
    let lookup = CaseInsensitiveSet::new(df.get_column_names_owned());
    columns
        .iter()
        .map(|(field, wanted)| {
            lookup
                .get(wanted)
                .map(|actual| (field, actual.to_string()))
                .ok_or_else(|| IngestError::MissingColumn {
                    column: wanted.to_string(),
                    field,
                })
        })
        .collect()
}

/// Reads one `RawRecord` per row.
///
/// Null cells become `None`. Any other cell must be a whole number in the
/// answer code range; the first one that is not fails the extraction.
pub fn extract_raw_records(df: &DataFrame, columns: &ColumnMap) -> Result<Vec<RawRecord>> {
    let resolved = resolve_columns(df, columns)?;
    debug!(mapping = ?resolved, "survey columns resolved");

    let mut records: Vec<RawRecord> = (0..df.height()).map(RawRecord::new).collect();
    for (field, name) in &resolved {
        let column = df.column(name)?;
        for (row, record) in records.iter_mut().enumerate() {
            let value = any_to_code(column.get(row)?).map_err(|source| {
                IngestError::InvalidCode {
                    row,
                    column: name.clone(),
                    source,
                }
            })?;
            record.set(*field, value);
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthdays_common::CodeError;

    fn survey_frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("avedrnk2".into(), vec![Some(2i64), None]).into(),
            Series::new("ALCDAY5".into(), vec![Some(103i64), Some(888)]).into(),
            Series::new("SMOKDAY2".into(), vec![Some(1i64), Some(3)]).into(),
            Series::new("_AGEG5YR".into(), vec![Some(4i64), Some(9)]).into(),
            Series::new("PHYSHLTH".into(), vec![Some(88i64), Some(5)]).into(),
            Series::new("SEXVAR".into(), vec![Some(1i64), Some(2)]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn extracts_records_case_insensitively() {
        let records = extract_raw_records(&survey_frame(), &ColumnMap::default()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            RawRecord {
                row: 0,
                avg_drinks_per_day: Some(2),
                days_drank_last_30: Some(103),
                smoking_frequency: Some(1),
                age_group: Some(4),
                unhealthy_days_last_30: Some(88),
            }
        );
        assert_eq!(records[1].row, 1);
        assert_eq!(records[1].avg_drinks_per_day, None);
    }

    #[test]
    fn missing_column_is_named() {
        let df = survey_frame().drop("PHYSHLTH").unwrap();
        let err = extract_raw_records(&df, &ColumnMap::default()).unwrap_err();
        match err {
            IngestError::MissingColumn { column, field } => {
                assert_eq!(column, "PHYSHLTH");
                assert_eq!(field, SurveyField::UnhealthyDaysLast30);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn fractional_code_is_rejected() {
        let df = DataFrame::new(vec![
            Series::new("AVEDRNK2".into(), vec![Some(2.0f64)]).into(),
            Series::new("ALCDAY5".into(), vec![Some(201.5f64)]).into(),
            Series::new("SMOKDAY2".into(), vec![Some(1.0f64)]).into(),
            Series::new("_AGEG5YR".into(), vec![Some(4.0f64)]).into(),
            Series::new("PHYSHLTH".into(), vec![Some(88.0f64)]).into(),
        ])
        .unwrap();
        let err = extract_raw_records(&df, &ColumnMap::default()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::InvalidCode {
                row: 0,
                source: CodeError::NonIntegral(_),
                ..
            }
        ));
    }
}
