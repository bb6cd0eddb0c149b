//! Polars `AnyValue` conversion helpers.
//!
//! Survey answer codes are small non-negative integers. Depending on the
//! source format they show up as `Int64` (CSV), `Float64` (XPT), or text, and
//! a blank answer shows up as `Null`. [`any_to_code`] folds all of those into
//! `Option<u16>` and rejects anything that is not a whole code.

use polars::prelude::AnyValue;
use thiserror::Error;

/// Largest distance from a whole number still accepted as an answer code.
///
/// SAS Transport files written by some mainframe tools store zero as a
/// denormal (around `5.4e-79`), so exact comparison is not an option.
pub const CODE_TOLERANCE: f64 = 1e-6;

/// A cell value that cannot be read as an answer code.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodeError {
    /// Numeric value with a fractional part.
    #[error("value {0} is not a whole number")]
    NonIntegral(f64),

    /// Whole number outside the `u16` code range.
    #[error("value {0} is outside the answer code range")]
    OutOfRange(i64),

    /// Text that does not parse as a number.
    #[error("value '{0}' is not numeric")]
    NotNumeric(String),
}

/// Converts a Polars `AnyValue` into an answer code.
///
/// Returns `Ok(None)` for `Null` and blank text, which is how a missing
/// answer is represented.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use healthdays_common::any_to_code;
///
/// assert_eq!(any_to_code(AnyValue::Null), Ok(None));
/// assert_eq!(any_to_code(AnyValue::Int64(88)), Ok(Some(88)));
/// assert_eq!(any_to_code(AnyValue::Float64(215.0)), Ok(Some(215)));
/// assert_eq!(any_to_code(AnyValue::String(" 7 ")), Ok(Some(7)));
/// assert!(any_to_code(AnyValue::Float64(2.5)).is_err());
/// ```
pub fn any_to_code(value: AnyValue<'_>) -> Result<Option<u16>, CodeError> {
    match value {
        AnyValue::Null => Ok(None),
        AnyValue::Int8(v) => whole_to_code(i64::from(v)).map(Some),
        AnyValue::Int16(v) => whole_to_code(i64::from(v)).map(Some),
        AnyValue::Int32(v) => whole_to_code(i64::from(v)).map(Some),
        AnyValue::Int64(v) => whole_to_code(v).map(Some),
        AnyValue::UInt8(v) => Ok(Some(u16::from(v))),
        AnyValue::UInt16(v) => Ok(Some(v)),
        AnyValue::UInt32(v) => whole_to_code(i64::from(v)).map(Some),
        AnyValue::UInt64(v) => {
            let whole = i64::try_from(v).map_err(|_| CodeError::OutOfRange(i64::MAX))?;
            whole_to_code(whole).map(Some)
        }
        AnyValue::Float32(v) => float_to_code(f64::from(v)).map(Some),
        AnyValue::Float64(v) => float_to_code(v).map(Some),
        AnyValue::String(s) => text_to_code(s),
        AnyValue::StringOwned(s) => text_to_code(&s),
        other => Err(CodeError::NotNumeric(other.to_string())),
    }
}

fn text_to_code(text: &str) -> Result<Option<u16>, CodeError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match parse_f64(trimmed) {
        Some(value) => float_to_code(value).map(Some),
        None => Err(CodeError::NotNumeric(trimmed.to_string())),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn float_to_code(value: f64) -> Result<u16, CodeError> {
    if !value.is_finite() {
        return Err(CodeError::NonIntegral(value));
    }
    let rounded = value.round();
    if (value - rounded).abs() > CODE_TOLERANCE {
        return Err(CodeError::NonIntegral(value));
    }
    if rounded < i64::MIN as f64 || rounded > i64::MAX as f64 {
        return Err(CodeError::NonIntegral(value));
    }
    whole_to_code(rounded as i64)
}

fn whole_to_code(value: i64) -> Result<u16, CodeError> {
    u16::try_from(value).map_err(|_| CodeError::OutOfRange(value))
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// # Examples
///
/// ```
/// use healthdays_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.50), "1.5");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Converts an `AnyValue` to `f64`, returning `None` for non-numeric or null values.
#[allow(clippy::cast_precision_loss)]
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    }
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}
