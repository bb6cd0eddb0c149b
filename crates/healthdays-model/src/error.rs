use std::path::PathBuf;

use thiserror::Error;

use crate::field::SurveyField;

/// A value reached the recoder that the filter should have excluded.
///
/// This is never a data-quality outcome. It means the filter and the recoder
/// disagree about the domain of a field, and the run must fail loudly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecodeError {
    #[error(
        "row {row}: invariant violated for {field} (value {}): {reason}",
        display_value(.value)
    )]
    InvariantViolation {
        row: usize,
        field: SurveyField,
        /// Raw value as read, or `None` when the field was absent.
        value: Option<u16>,
        reason: &'static str,
    },
}

impl RecodeError {
    pub fn invariant(
        row: usize,
        field: SurveyField,
        value: Option<u16>,
        reason: &'static str,
    ) -> Self {
        Self::InvariantViolation {
            row,
            field,
            value,
            reason,
        }
    }

    /// Source row of the offending record.
    pub fn row(&self) -> usize {
        match self {
            Self::InvariantViolation { row, .. } => *row,
        }
    }

    pub fn field(&self) -> SurveyField {
        match self {
            Self::InvariantViolation { field, .. } => *field,
        }
    }
}

/// Errors from loading a column map file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read column map {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse column map {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("column map assigns an empty column name to {field}")]
    EmptyColumn { field: SurveyField },

    #[error("column {column} is mapped to both {first} and {second}")]
    DuplicateColumn {
        column: String,
        first: SurveyField,
        second: SurveyField,
    },
}

fn display_value(value: &Option<u16>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "missing".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, RecodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_violation_message() {
        let err = RecodeError::invariant(
            12,
            SurveyField::AgeGroup,
            Some(14),
            "age group outside 1..=10",
        );
        assert_eq!(
            err.to_string(),
            "row 12: invariant violated for age_group (value 14): age group outside 1..=10"
        );
        assert_eq!(err.row(), 12);
        assert_eq!(err.field(), SurveyField::AgeGroup);
    }

    #[test]
    fn invariant_violation_missing_value() {
        let err = RecodeError::invariant(3, SurveyField::SmokingFrequency, None, "absent");
        assert!(err.to_string().contains("(value missing)"));
    }
}
