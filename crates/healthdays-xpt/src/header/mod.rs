//! XPT header records.
//!
//! A V5 transport file is a sequence of 80-byte records:
//!
//! 1. `LIBRARY` header, then two records with SAS version and timestamps
//! 2. `MEMBER` header (carries the NAMESTR length) and `DSCRPTR` header
//! 3. Member data (dataset name, created) and member second (modified, label)
//! 4. `NAMESTR` header (variable count), then one NAMESTR per variable
//! 5. `OBS` header, then observation bytes padded to the record boundary

use chrono::NaiveDateTime;

use crate::error::{Result, XptError};

pub mod namestr;

pub use namestr::{NAMESTR_LEN, build_namestr, parse_namestr, parse_namestr_records};

/// Record length in bytes.
pub const RECORD_LEN: usize = 80;

const HEADER_LEAD: &[u8; 20] = b"HEADER RECORD*******";
const HEADER_TRAIL: &[u8; 20] = b"HEADER RECORD!!!!!!!";
const DATETIME_FORMAT: &str = "%d%b%y:%H:%M:%S";

/// The fixed header records that introduce each section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    Library,
    Member,
    Descriptor,
    Namestr,
    Observation,
}

impl HeaderKind {
    fn tag(self) -> &'static [u8; 8] {
        match self {
            HeaderKind::Library => b"LIBRARY ",
            HeaderKind::Member => b"MEMBER  ",
            HeaderKind::Descriptor => b"DSCRPTR ",
            HeaderKind::Namestr => b"NAMESTR ",
            HeaderKind::Observation => b"OBS     ",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HeaderKind::Library => "LIBRARY HEADER",
            HeaderKind::Member => "MEMBER HEADER",
            HeaderKind::Descriptor => "DSCRPTR HEADER",
            HeaderKind::Namestr => "NAMESTR HEADER",
            HeaderKind::Observation => "OBS HEADER",
        }
    }

    /// Whether `record` is this kind of header.
    pub fn matches(self, record: &[u8]) -> bool {
        record.len() >= 48
            && &record[..20] == HEADER_LEAD
            && &record[20..28] == self.tag()
            && &record[28..48] == HEADER_TRAIL
    }

    pub fn expect(self, record: &[u8]) -> Result<()> {
        if self.matches(record) {
            Ok(())
        } else {
            Err(XptError::missing_header(self.name()))
        }
    }

    /// Builds the header record with its zero-filled tail.
    #[must_use]
    pub fn build(self) -> [u8; RECORD_LEN] {
        let mut record = [b' '; RECORD_LEN];
        record[..20].copy_from_slice(HEADER_LEAD);
        record[20..28].copy_from_slice(self.tag());
        record[28..48].copy_from_slice(HEADER_TRAIL);
        record[48..78].fill(b'0');
        record
    }
}

/// Library-level metadata written in the two records after the library header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryInfo {
    pub sas_version: String,
    pub os_name: String,
    pub created: NaiveDateTime,
    pub modified: NaiveDateTime,
}

/// Builds the library real header: SAS symbols, version, OS, created.
#[must_use]
pub fn build_library_real(info: &LibraryInfo) -> [u8; RECORD_LEN] {
    let mut record = [b' '; RECORD_LEN];
    write_text(&mut record, 0, "SAS", 8);
    write_text(&mut record, 8, "SAS", 8);
    write_text(&mut record, 16, "SASLIB", 8);
    write_text(&mut record, 24, &info.sas_version, 8);
    write_text(&mut record, 32, &info.os_name, 8);
    write_text(&mut record, 64, &format_xpt_datetime(&info.created), 16);
    record
}

/// Builds the record holding the library modified datetime.
#[must_use]
pub fn build_library_modified(info: &LibraryInfo) -> [u8; RECORD_LEN] {
    let mut record = [b' '; RECORD_LEN];
    write_text(&mut record, 0, &format_xpt_datetime(&info.modified), 16);
    record
}

/// Member header with the observation header size and NAMESTR length.
#[must_use]
pub fn build_member_header() -> [u8; RECORD_LEN] {
    let mut record = HeaderKind::Member.build();
    write_text(&mut record, 64, "0160", 4);
    write_text(&mut record, 74, &format!("{NAMESTR_LEN:04}"), 4);
    record
}

#[must_use]
pub fn build_member_data(name: &str, info: &LibraryInfo) -> [u8; RECORD_LEN] {
    let mut record = [b' '; RECORD_LEN];
    write_text(&mut record, 0, "SAS", 8);
    write_text(&mut record, 8, name, 8);
    write_text(&mut record, 16, "SASDATA", 8);
    write_text(&mut record, 24, &info.sas_version, 8);
    write_text(&mut record, 32, &info.os_name, 8);
    write_text(&mut record, 64, &format_xpt_datetime(&info.created), 16);
    record
}

#[must_use]
pub fn build_member_second(label: Option<&str>, info: &LibraryInfo) -> [u8; RECORD_LEN] {
    let mut record = [b' '; RECORD_LEN];
    write_text(&mut record, 0, &format_xpt_datetime(&info.modified), 16);
    write_text(&mut record, 32, label.unwrap_or(""), 40);
    record
}

/// NAMESTR header carrying the variable count.
#[must_use]
pub fn build_namestr_header(var_count: usize) -> [u8; RECORD_LEN] {
    let mut record = HeaderKind::Namestr.build();
    write_text(&mut record, 54, &format!("{var_count:04}"), 4);
    record
}

/// NAMESTR length from the member header (140, or 136 on VAX/VMS).
pub fn parse_namestr_len(record: &[u8]) -> Result<usize> {
    parse_digits(record, 74, 4, "NAMESTR length")
}

/// Variable count from the NAMESTR header.
pub fn parse_variable_count(record: &[u8]) -> Result<usize> {
    parse_digits(record, 54, 4, "variable count")
}

/// Dataset name and created datetime from the member data record.
pub fn parse_member_data(record: &[u8]) -> Result<(String, Option<NaiveDateTime>)> {
    let name = read_text(record, 8, 8);
    if name.is_empty() {
        return Err(XptError::invalid_format("empty dataset name"));
    }
    let created = parse_xpt_datetime(&read_text(record, 64, 16));
    Ok((name, created))
}

/// Dataset label from the member second record.
pub fn parse_member_label(record: &[u8]) -> Option<String> {
    let label = read_text(record, 32, 40);
    if label.is_empty() { None } else { Some(label) }
}

/// Rounds an offset up to the next record boundary.
pub fn align_to_record(offset: usize) -> usize {
    offset.div_ceil(RECORD_LEN) * RECORD_LEN
}

/// Formats a datetime as `ddMMMyy:hh:mm:ss`, e.g. `15MAR24:14:30:45`.
pub fn format_xpt_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string().to_uppercase()
}

/// Parses a `ddMMMyy:hh:mm:ss` datetime; `None` when blank or malformed.
pub fn parse_xpt_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(text, DATETIME_FORMAT).ok()
}

fn parse_digits(record: &[u8], offset: usize, len: usize, field: &'static str) -> Result<usize> {
    read_text(record, offset, len)
        .trim()
        .parse::<usize>()
        .map_err(|_| XptError::NumericParse { field })
}

/// Reads a space-padded ASCII field.
pub(crate) fn read_text(data: &[u8], offset: usize, len: usize) -> String {
    data.get(offset..offset + len)
        .map(|slice| String::from_utf8_lossy(slice).trim_end().to_string())
        .unwrap_or_default()
}

/// Writes a space-padded ASCII field; non-ASCII characters become `?`.
pub(crate) fn write_text(buf: &mut [u8], offset: usize, value: &str, len: usize) {
    let field = &mut buf[offset..offset + len];
    field.fill(b' ');
    for (slot, ch) in field.iter_mut().zip(value.chars()) {
        *slot = if ch.is_ascii() { ch as u8 } else { b'?' };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_info() -> LibraryInfo {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(14, 30, 45)
            .unwrap();
        LibraryInfo {
            sas_version: "9.4".to_string(),
            os_name: "LINUX".to_string(),
            created: dt,
            modified: dt,
        }
    }

    #[test]
    fn header_prefixes() {
        let record = HeaderKind::Library.build();
        assert!(record.starts_with(b"HEADER RECORD*******LIBRARY HEADER RECORD!!!!!!!"));
        assert!(record[48..78].iter().all(|&b| b == b'0'));
        assert_eq!(&record[78..], b"  ");
        assert!(HeaderKind::Library.expect(&record).is_ok());
        assert!(HeaderKind::Observation.expect(&record).is_err());
    }

    #[test]
    fn member_header_carries_namestr_len() {
        let record = build_member_header();
        assert!(HeaderKind::Member.matches(&record));
        assert_eq!(parse_namestr_len(&record).unwrap(), 140);
    }

    #[test]
    fn namestr_header_carries_count() {
        let record = build_namestr_header(5);
        assert_eq!(parse_variable_count(&record).unwrap(), 5);
    }

    #[test]
    fn member_records_round_trip() {
        let info = sample_info();
        let data = build_member_data("HEALTH", &info);
        let (name, created) = parse_member_data(&data).unwrap();
        assert_eq!(name, "HEALTH");
        assert_eq!(created, Some(info.created));

        let second = build_member_second(Some("Recoded survey"), &info);
        assert_eq!(parse_member_label(&second), Some("Recoded survey".to_string()));
        assert_eq!(parse_member_label(&build_member_second(None, &info)), None);
    }

    #[test]
    fn library_real_header_layout() {
        let record = build_library_real(&sample_info());
        assert_eq!(&record[..24], b"SAS     SAS     SASLIB  ");
        assert_eq!(read_text(&record, 24, 8), "9.4");
        assert_eq!(read_text(&record, 64, 16), "15MAR24:14:30:45");
    }

    #[test]
    fn datetime_format() {
        let info = sample_info();
        assert_eq!(format_xpt_datetime(&info.created), "15MAR24:14:30:45");
        assert_eq!(parse_xpt_datetime("15MAR24:14:30:45"), Some(info.created));
        assert_eq!(parse_xpt_datetime(""), None);
        assert_eq!(parse_xpt_datetime("garbage"), None);
    }

    #[test]
    fn alignment() {
        assert_eq!(align_to_record(0), 0);
        assert_eq!(align_to_record(1), 80);
        assert_eq!(align_to_record(280), 320);
    }
}
