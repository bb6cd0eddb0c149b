//! Transport file errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing a transport file.
#[derive(Debug, Error)]
pub enum XptError {
    #[error("transport file not found: {path}")]
    FileNotFound { path: PathBuf },

    // === Layout ===
    #[error("not a V5 transport file: {message}")]
    InvalidFormat { message: String },

    #[error("expected {expected} record")]
    MissingHeader { expected: &'static str },

    #[error("variable descriptor {index}: {message}")]
    InvalidNamestr { index: usize, message: String },

    #[error("80-byte record at offset {offset} runs past end of file")]
    RecordOutOfBounds { offset: usize },

    #[error("header field {field} is not a number")]
    NumericParse { field: &'static str },

    #[error("observation length overflows usize")]
    ObservationOverflow,

    #[error("observation data ends with a partial row")]
    TrailingBytes,

    // === Writer input ===
    #[error("member name '{name}' must be 1-8 characters")]
    InvalidMemberName { name: String },

    #[error("variable name '{name}' must be 1-8 characters")]
    InvalidVariableName { name: String },

    #[error("variable {name} appears twice")]
    DuplicateVariable { name: String },

    #[error("variable {name} has unsupported length {length}")]
    InvalidLength { name: String, length: u16 },

    #[error("row has {actual} values for {expected} variables")]
    RowLengthMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, XptError>;

impl XptError {
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    pub fn missing_header(expected: &'static str) -> Self {
        Self::MissingHeader { expected }
    }

    pub fn invalid_namestr(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidNamestr {
            index,
            message: message.into(),
        }
    }
}
