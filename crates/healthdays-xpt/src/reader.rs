//! XPT file reader.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Result, XptError};
use crate::float::{ibm_to_ieee, is_missing};
use crate::header::{
    HeaderKind, RECORD_LEN, align_to_record, parse_member_data, parse_member_label,
    parse_namestr_len, parse_namestr_records, parse_variable_count,
};
use crate::options::XptReaderOptions;
use crate::types::{MissingValue, NumericValue, XptColumn, XptDataset, XptType, XptValue};

/// Reads the first member of a SAS Transport V5 file.
pub struct XptReader<R: Read> {
    reader: BufReader<R>,
    options: XptReaderOptions,
}

impl<R: Read> XptReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, XptReaderOptions::default())
    }

    pub fn with_options(reader: R, options: XptReaderOptions) -> Self {
        Self {
            reader: BufReader::new(reader),
            options,
        }
    }

    /// Reads the whole stream and parses the first dataset.
    pub fn read_dataset(mut self) -> Result<XptDataset> {
        let mut data = Vec::new();
        self.reader.read_to_end(&mut data)?;
        parse_xpt(&data, &self.options)
    }
}

impl XptReader<File> {
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_options(path, XptReaderOptions::default())
    }

    pub fn open_with_options(path: &Path, options: XptReaderOptions) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                XptError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                XptError::Io(e)
            }
        })?;
        Ok(Self::with_options(file, options))
    }
}

/// Reads an XPT file from a path.
pub fn read_xpt(path: &Path) -> Result<XptDataset> {
    XptReader::open(path)?.read_dataset()
}

/// Parses an in-memory transport file.
pub fn parse_xpt(data: &[u8], options: &XptReaderOptions) -> Result<XptDataset> {
    if data.len() < RECORD_LEN * 8 {
        return Err(XptError::invalid_format("file too small"));
    }
    if !data.len().is_multiple_of(RECORD_LEN) {
        return Err(XptError::invalid_format(
            "file length is not a multiple of 80",
        ));
    }

    let mut cursor = Cursor { data, offset: 0 };

    HeaderKind::Library.expect(cursor.record()?)?;
    // Real header and modified datetime carry nothing the dataset needs.
    cursor.skip(2);

    let member_header = cursor.record()?;
    HeaderKind::Member.expect(member_header)?;
    let namestr_len = parse_namestr_len(member_header)?;

    HeaderKind::Descriptor.expect(cursor.record()?)?;
    let (name, created) = parse_member_data(cursor.record()?)?;
    let label = parse_member_label(cursor.record()?);

    let namestr_header = cursor.record()?;
    HeaderKind::Namestr.expect(namestr_header)?;
    let var_count = parse_variable_count(namestr_header)?;

    let namestr_total = var_count
        .checked_mul(namestr_len)
        .ok_or(XptError::ObservationOverflow)?;
    let namestr_data = cursor.block(namestr_total)?;
    let columns = parse_namestr_records(namestr_data, var_count, namestr_len)?;
    cursor.offset = align_to_record(cursor.offset);

    HeaderKind::Observation.expect(cursor.record()?)?;

    let layout = ObservationLayout::new(&columns, options)?;
    let rows = parse_observations(&data[cursor.offset..], &layout, &columns, options)?;
    let columns = layout.select_columns(columns);

    Ok(XptDataset {
        name,
        label,
        created,
        columns,
        rows,
    })
}

/// Byte positions of the selected variables within one observation.
struct ObservationLayout {
    obs_len: usize,
    /// (column index, byte offset) for every selected variable, in file order.
    selected: Vec<(usize, usize)>,
}

impl ObservationLayout {
    fn new(columns: &[XptColumn], options: &XptReaderOptions) -> Result<Self> {
        let mut obs_len = 0usize;
        let mut selected = Vec::new();
        for (index, column) in columns.iter().enumerate() {
            if options.selects(&column.name) {
                selected.push((index, obs_len));
            }
            obs_len = obs_len
                .checked_add(usize::from(column.length))
                .ok_or(XptError::ObservationOverflow)?;
        }
        Ok(Self { obs_len, selected })
    }

    fn select_columns(&self, columns: Vec<XptColumn>) -> Vec<XptColumn> {
        if self.selected.len() == columns.len() {
            return columns;
        }
        let mut columns: Vec<Option<XptColumn>> = columns.into_iter().map(Some).collect();
        self.selected
            .iter()
            .filter_map(|&(index, _)| columns[index].take())
            .collect()
    }
}

struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn record(&mut self) -> Result<&'a [u8]> {
        self.block(RECORD_LEN)
    }

    fn block(&mut self, len: usize) -> Result<&'a [u8]> {
        let slice = self
            .data
            .get(self.offset..self.offset + len)
            .ok_or(XptError::RecordOutOfBounds {
                offset: self.offset,
            })?;
        self.offset += len;
        Ok(slice)
    }

    fn skip(&mut self, records: usize) {
        self.offset += records * RECORD_LEN;
    }
}

/// Splits observation bytes into rows, decoding only the selected variables.
///
/// The last record is space-padded, so trailing all-space rows are dropped.
fn parse_observations(
    data: &[u8],
    layout: &ObservationLayout,
    columns: &[XptColumn],
    options: &XptReaderOptions,
) -> Result<Vec<Vec<XptValue>>> {
    let obs_len = layout.obs_len;
    if obs_len == 0 {
        return Ok(Vec::new());
    }

    let chunks = data.chunks_exact(obs_len);
    if chunks.remainder().iter().any(|&b| b != b' ') {
        return Err(XptError::TrailingBytes);
    }

    let blank_rows = chunks
        .clone()
        .rev()
        .take_while(|row| row.iter().all(|&b| b == b' '))
        .count();
    let row_count = data.len() / obs_len - blank_rows;

    Ok(chunks
        .take(row_count)
        .map(|row| parse_row(row, layout, columns, options))
        .collect())
}

fn parse_row(
    row: &[u8],
    layout: &ObservationLayout,
    columns: &[XptColumn],
    options: &XptReaderOptions,
) -> Vec<XptValue> {
    layout
        .selected
        .iter()
        .map(|&(index, offset)| {
            let column = &columns[index];
            let slice = &row[offset..offset + usize::from(column.length)];
            match column.data_type {
                XptType::Char => XptValue::Char(decode_char(slice, options.trim_strings)),
                XptType::Num => XptValue::Num(decode_numeric(slice)),
            }
        })
        .collect()
}

fn decode_char(bytes: &[u8], trim: bool) -> String {
    let text = String::from_utf8_lossy(bytes);
    if trim {
        text.trim_end().to_string()
    } else {
        text.into_owned()
    }
}

fn decode_numeric(bytes: &[u8]) -> NumericValue {
    if bytes.is_empty() {
        return NumericValue::Missing(MissingValue::Standard);
    }
    if let Some(missing) = is_missing(bytes) {
        return NumericValue::Missing(missing);
    }

    let mut buf = [0u8; 8];
    let len = bytes.len().min(8);
    buf[..len].copy_from_slice(&bytes[..len]);
    NumericValue::Value(ibm_to_ieee(buf))
}
