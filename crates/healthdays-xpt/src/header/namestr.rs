//! NAMESTR records: one 140-byte variable descriptor per column.
//!
//! | Offset | Field  | Meaning                         |
//! |--------|--------|---------------------------------|
//! | 0-1    | ntype  | 1 numeric, 2 character          |
//! | 4-5    | nlng   | bytes per observation           |
//! | 6-7    | nvar0  | 1-based variable number         |
//! | 8-15   | nname  | name                            |
//! | 16-55  | nlabel | label                           |
//! | 56-63  | nform  | format name                     |
//! | 84-87  | npos   | byte offset in the observation  |
//!
//! Integers are big-endian. Everything not listed is written as zero.

use crate::error::{Result, XptError};
use crate::types::{XptColumn, XptType};

use super::{read_text, write_text};

pub const NAMESTR_LEN: usize = 140;

/// Shortest NAMESTR we accept (VAX/VMS writes 136 bytes).
const NAMESTR_MIN_LEN: usize = 88;

pub fn parse_namestr(data: &[u8], index: usize) -> Result<XptColumn> {
    if data.len() < NAMESTR_MIN_LEN {
        return Err(XptError::invalid_namestr(
            index,
            format!("data too short: {} bytes", data.len()),
        ));
    }

    let ntype = read_i16(data, 0);
    let data_type = XptType::from_ntype(ntype)
        .ok_or_else(|| XptError::invalid_namestr(index, format!("invalid ntype: {ntype}")))?;

    let length = u16::try_from(read_i16(data, 4))
        .ok()
        .filter(|len| *len > 0)
        .ok_or_else(|| XptError::invalid_namestr(index, "variable length must be positive"))?;

    let name = read_text(data, 8, 8);
    if name.is_empty() {
        return Err(XptError::invalid_namestr(index, "empty variable name"));
    }

    let label = read_text(data, 16, 40);
    let format = read_text(data, 56, 8);

    Ok(XptColumn {
        name,
        label: (!label.is_empty()).then_some(label),
        data_type,
        length,
        format: (!format.is_empty()).then_some(format),
    })
}

/// Builds the NAMESTR for `column`, the `varnum`-th variable at byte `position`.
#[must_use]
pub fn build_namestr(column: &XptColumn, varnum: u16, position: u32) -> [u8; NAMESTR_LEN] {
    let mut buf = [0u8; NAMESTR_LEN];
    buf[0..2].copy_from_slice(&column.data_type.to_ntype().to_be_bytes());
    buf[4..6].copy_from_slice(&column.length.to_be_bytes());
    buf[6..8].copy_from_slice(&varnum.to_be_bytes());
    write_text(&mut buf, 8, &column.name, 8);
    write_text(&mut buf, 16, column.label.as_deref().unwrap_or(""), 40);
    write_text(&mut buf, 56, column.format.as_deref().unwrap_or(""), 8);
    write_text(&mut buf, 72, "", 8);
    buf[84..88].copy_from_slice(&position.to_be_bytes());
    buf
}

/// Parses `var_count` consecutive NAMESTR records of `namestr_len` bytes.
pub fn parse_namestr_records(
    data: &[u8],
    var_count: usize,
    namestr_len: usize,
) -> Result<Vec<XptColumn>> {
    (0..var_count)
        .map(|index| {
            let start = index
                .checked_mul(namestr_len)
                .ok_or(XptError::ObservationOverflow)?;
            let record = data
                .get(start..start + namestr_len)
                .ok_or_else(|| XptError::invalid_namestr(index, "NAMESTR data out of bounds"))?;
            parse_namestr(record, index)
        })
        .collect()
}

fn read_i16(data: &[u8], offset: usize) -> i16 {
    i16::from_be_bytes([data[offset], data[offset + 1]])
}
