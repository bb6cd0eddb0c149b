//! XPT file writer.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, XptError};
use crate::float::{encode_missing, ieee_to_ibm, truncate_ibm};
use crate::header::{
    HeaderKind, RECORD_LEN, build_library_modified, build_library_real, build_member_data,
    build_member_header, build_member_second, build_namestr, build_namestr_header,
};
use crate::options::XptWriterOptions;
use crate::types::{NumericValue, XptColumn, XptDataset, XptType, XptValue};

/// Writes a single dataset as a SAS Transport V5 file.
pub struct XptWriter<W: Write> {
    writer: BufWriter<W>,
    options: XptWriterOptions,
}

impl<W: Write> XptWriter<W> {
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, XptWriterOptions::default())
    }

    pub fn with_options(writer: W, options: XptWriterOptions) -> Self {
        Self {
            writer: BufWriter::new(writer),
            options,
        }
    }

    pub fn write_dataset(mut self, dataset: &XptDataset) -> Result<()> {
        validate_dataset(dataset)?;
        let info = self.options.library_info();

        self.writer.write_all(&HeaderKind::Library.build())?;
        self.writer.write_all(&build_library_real(&info))?;
        self.writer.write_all(&build_library_modified(&info))?;

        self.writer.write_all(&build_member_header())?;
        self.writer.write_all(&HeaderKind::Descriptor.build())?;
        self.writer
            .write_all(&build_member_data(&dataset.name.to_uppercase(), &info))?;
        self.writer
            .write_all(&build_member_second(dataset.label.as_deref(), &info))?;

        self.writer
            .write_all(&build_namestr_header(dataset.columns.len()))?;
        let mut records = RecordWriter::new(&mut self.writer);
        let mut position = 0u32;
        for (idx, column) in dataset.columns.iter().enumerate() {
            let varnum = u16::try_from(idx + 1).map_err(|_| XptError::ObservationOverflow)?;
            records.write_bytes(&build_namestr(column, varnum, position))?;
            position = position.saturating_add(u32::from(column.length));
        }
        records.finish()?;

        self.writer.write_all(&HeaderKind::Observation.build())?;
        let mut records = RecordWriter::new(&mut self.writer);
        let mut obs = Vec::with_capacity(dataset.observation_length());
        for row in &dataset.rows {
            obs.clear();
            for (value, column) in row.iter().zip(&dataset.columns) {
                obs.extend_from_slice(&encode_value(value, column));
            }
            records.write_bytes(&obs)?;
        }
        records.finish()?;

        self.writer.flush()?;
        Ok(())
    }
}

impl XptWriter<File> {
    pub fn create(path: &Path, options: XptWriterOptions) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::with_options(file, options))
    }
}

/// Writes a dataset to an XPT file.
pub fn write_xpt(path: &Path, dataset: &XptDataset, options: XptWriterOptions) -> Result<()> {
    XptWriter::create(path, options)?.write_dataset(dataset)
}

/// Checks V5 naming limits, column lengths, and row widths.
fn validate_dataset(dataset: &XptDataset) -> Result<()> {
    if !is_valid_v5_name(&dataset.name) {
        return Err(XptError::InvalidMemberName {
            name: dataset.name.clone(),
        });
    }

    let mut seen = BTreeSet::new();
    for column in &dataset.columns {
        if !is_valid_v5_name(&column.name) {
            return Err(XptError::InvalidVariableName {
                name: column.name.clone(),
            });
        }
        if !seen.insert(column.name.trim().to_uppercase()) {
            return Err(XptError::DuplicateVariable {
                name: column.name.clone(),
            });
        }
        let valid_length = match column.data_type {
            XptType::Num => (3..=8).contains(&column.length),
            XptType::Char => column.length > 0,
        };
        if !valid_length {
            return Err(XptError::InvalidLength {
                name: column.name.clone(),
                length: column.length,
            });
        }
    }

    if let Some(row) = dataset
        .rows
        .iter()
        .find(|row| row.len() != dataset.columns.len())
    {
        return Err(XptError::RowLengthMismatch {
            expected: dataset.columns.len(),
            actual: row.len(),
        });
    }
    Ok(())
}

fn is_valid_v5_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && name.len() <= 8 && name.is_ascii()
}

fn encode_value(value: &XptValue, column: &XptColumn) -> Vec<u8> {
    match (value, column.data_type) {
        (XptValue::Char(s), XptType::Char) => encode_char(s, column.length),
        (XptValue::Num(n), XptType::Num) => encode_numeric(n, column.length),
        (XptValue::Char(s), XptType::Num) => {
            let parsed = s
                .trim()
                .parse::<f64>()
                .map_or(NumericValue::Missing(Default::default()), NumericValue::Value);
            encode_numeric(&parsed, column.length)
        }
        (XptValue::Num(n), XptType::Char) => {
            let text = n.value().map(|v| v.to_string()).unwrap_or_default();
            encode_char(&text, column.length)
        }
    }
}

fn encode_char(value: &str, length: u16) -> Vec<u8> {
    let len = usize::from(length);
    let mut out: Vec<u8> = value
        .chars()
        .take(len)
        .map(|ch| if ch.is_ascii() { ch as u8 } else { b'?' })
        .collect();
    out.resize(len, b' ');
    out
}

fn encode_numeric(value: &NumericValue, length: u16) -> Vec<u8> {
    let bytes = match value {
        NumericValue::Missing(m) => encode_missing(*m),
        NumericValue::Value(v) => ieee_to_ibm(*v),
    };
    truncate_ibm(bytes, usize::from(length))
}

/// Packs byte runs into space-padded 80-byte records.
struct RecordWriter<'a, W: Write> {
    writer: &'a mut W,
    record: [u8; RECORD_LEN],
    pos: usize,
}

impl<'a, W: Write> RecordWriter<'a, W> {
    fn new(writer: &'a mut W) -> Self {
        Self {
            writer,
            record: [b' '; RECORD_LEN],
            pos: 0,
        }
    }

    fn write_bytes(&mut self, mut bytes: &[u8]) -> Result<()> {
        while !bytes.is_empty() {
            let take = (RECORD_LEN - self.pos).min(bytes.len());
            self.record[self.pos..self.pos + take].copy_from_slice(&bytes[..take]);
            self.pos += take;
            bytes = &bytes[take..];
            if self.pos == RECORD_LEN {
                self.writer.write_all(&self.record)?;
                self.record = [b' '; RECORD_LEN];
                self.pos = 0;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.pos > 0 {
            self.writer.write_all(&self.record)?;
            self.record = [b' '; RECORD_LEN];
            self.pos = 0;
        }
        Ok(())
    }
}
