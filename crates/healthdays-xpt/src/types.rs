//! In-memory representation of a SAS Transport dataset.

use chrono::NaiveDateTime;

use crate::error::{Result, XptError};

/// Variable storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XptType {
    Num,
    Char,
}

impl XptType {
    /// Decodes the NAMESTR `ntype` field.
    pub fn from_ntype(ntype: i16) -> Option<Self> {
        match ntype {
            1 => Some(XptType::Num),
            2 => Some(XptType::Char),
            _ => None,
        }
    }

    pub fn to_ntype(self) -> i16 {
        match self {
            XptType::Num => 1,
            XptType::Char => 2,
        }
    }
}

/// One of the 28 SAS numeric missing codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingValue {
    /// `.`
    #[default]
    Standard,
    /// `._`
    Underscore,
    /// `.A` through `.Z`
    Special(char),
}

impl MissingValue {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'.' => Some(MissingValue::Standard),
            b'_' => Some(MissingValue::Underscore),
            b'A'..=b'Z' => Some(MissingValue::Special(char::from(byte))),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            MissingValue::Standard => b'.',
            MissingValue::Underscore => b'_',
            MissingValue::Special(c) if c.is_ascii_uppercase() => c as u8,
            MissingValue::Special(_) => b'.',
        }
    }
}

/// A numeric cell: either a number or a missing code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericValue {
    Value(f64),
    Missing(MissingValue),
}

impl NumericValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, NumericValue::Missing(_))
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            NumericValue::Value(v) => Some(*v),
            NumericValue::Missing(_) => None,
        }
    }
}

/// A single cell.
#[derive(Debug, Clone, PartialEq)]
pub enum XptValue {
    Num(NumericValue),
    Char(String),
}

impl XptValue {
    pub fn numeric(value: f64) -> Self {
        XptValue::Num(NumericValue::Value(value))
    }

    pub fn numeric_missing() -> Self {
        XptValue::Num(NumericValue::Missing(MissingValue::Standard))
    }

    pub fn character(value: impl Into<String>) -> Self {
        XptValue::Char(value.into())
    }

    /// Numeric missing values and blank character values are missing.
    pub fn is_missing(&self) -> bool {
        match self {
            XptValue::Num(n) => n.is_missing(),
            XptValue::Char(s) => s.trim().is_empty(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            XptValue::Num(n) => n.value(),
            XptValue::Char(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            XptValue::Char(s) => Some(s),
            XptValue::Num(_) => None,
        }
    }
}

/// Variable definition (one NAMESTR record).
#[derive(Debug, Clone, PartialEq)]
pub struct XptColumn {
    pub name: String,
    pub label: Option<String>,
    pub data_type: XptType,
    /// Bytes per observation.
    pub length: u16,
    pub format: Option<String>,
}

impl XptColumn {
    /// Numeric variable stored in 8 bytes.
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            data_type: XptType::Num,
            length: 8,
            format: None,
        }
    }

    pub fn character(name: impl Into<String>, length: u16) -> Self {
        Self {
            name: name.into(),
            label: None,
            data_type: XptType::Char,
            length,
            format: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// A single-member SAS Transport dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XptDataset {
    /// Member name (up to 8 characters).
    pub name: String,
    pub label: Option<String>,
    /// Creation time from the member header, when it parses.
    pub created: Option<NaiveDateTime>,
    pub columns: Vec<XptColumn>,
    pub rows: Vec<Vec<XptValue>>,
}

impl XptDataset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_columns(name: impl Into<String>, columns: Vec<XptColumn>) -> Self {
        Self {
            name: name.into(),
            columns,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Appends a row, which must have one value per column.
    pub fn add_row(&mut self, row: Vec<XptValue>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(XptError::RowLengthMismatch {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Bytes per observation.
    pub fn observation_length(&self) -> usize {
        self.columns.iter().map(|c| usize::from(c.length)).sum()
    }

    /// Position of a column by case-insensitive name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Iterates one column's values.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = Option<&XptValue>> {
        self.rows.iter().map(move |row| row.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_value_bytes() {
        assert_eq!(MissingValue::from_byte(b'.'), Some(MissingValue::Standard));
        assert_eq!(MissingValue::from_byte(b'Q'), Some(MissingValue::Special('Q')));
        assert_eq!(MissingValue::from_byte(b'a'), None);
        assert_eq!(MissingValue::Special('D').to_byte(), b'D');
        assert_eq!(MissingValue::Underscore.to_byte(), b'_');
    }

    #[test]
    fn add_row_checks_width() {
        let mut ds = XptDataset::with_columns("T", vec![XptColumn::numeric("A")]);
        assert!(ds.add_row(vec![XptValue::numeric(1.0)]).is_ok());
        let err = ds
            .add_row(vec![XptValue::numeric(1.0), XptValue::numeric(2.0)])
            .unwrap_err();
        assert!(matches!(
            err,
            XptError::RowLengthMismatch {
                expected: 1,
                actual: 2
            }
        ));
        assert_eq!(ds.num_rows(), 1);
    }

    #[test]
    fn observation_length_sums_columns() {
        let ds = XptDataset::with_columns(
            "T",
            vec![XptColumn::numeric("A"), XptColumn::character("B", 20)],
        );
        assert_eq!(ds.observation_length(), 28);
        assert_eq!(ds.column_index("b"), Some(1));
    }

    #[test]
    fn blank_character_is_missing() {
        assert!(XptValue::character("  ").is_missing());
        assert!(XptValue::numeric_missing().is_missing());
        assert!(!XptValue::numeric(0.0).is_missing());
    }
}
