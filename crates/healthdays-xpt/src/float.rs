//! IBM System/360 hexadecimal floating point.
//!
//! SAS Transport stores numbers as 8-byte IBM floats: one sign bit, a 7-bit
//! base-16 exponent biased by 64, and a 56-bit fraction in `[1/16, 1)`.
//! Missing values use the first byte as a marker and zero the rest.

use crate::types::MissingValue;

const FRACTION_BITS: i32 = 56;
const EXPONENT_BIAS: i32 = 64;

/// Decodes an IBM float into an IEEE `f64`.
///
/// The 56-bit fraction is wider than an `f64` mantissa, so the lowest bits
/// are rounded away.
///
/// # Examples
///
/// ```
/// use healthdays_xpt::float::ibm_to_ieee;
///
/// assert_eq!(ibm_to_ieee([0x41, 0x10, 0, 0, 0, 0, 0, 0]), 1.0);
/// assert_eq!(ibm_to_ieee([0xC2, 0x76, 0xA0, 0, 0, 0, 0, 0]), -118.625);
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn ibm_to_ieee(bytes: [u8; 8]) -> f64 {
    let negative = bytes[0] & 0x80 != 0;
    let exponent = i32::from(bytes[0] & 0x7f) - EXPONENT_BIAS;

    let mut fraction = 0u64;
    for byte in &bytes[1..] {
        fraction = (fraction << 8) | u64::from(*byte);
    }
    if fraction == 0 {
        return if negative { -0.0 } else { 0.0 };
    }

    let magnitude = fraction as f64 * 2f64.powi(4 * exponent - FRACTION_BITS);
    if negative { -magnitude } else { magnitude }
}

/// Encodes an IEEE `f64` as an IBM float.
///
/// Values too small for the IBM range become zero and values too large
/// saturate to the largest IBM magnitude. Non-finite values encode as the
/// standard missing value.
///
/// # Examples
///
/// ```
/// use healthdays_xpt::float::ieee_to_ibm;
///
/// assert_eq!(ieee_to_ibm(1.0), [0x41, 0x10, 0, 0, 0, 0, 0, 0]);
/// assert_eq!(ieee_to_ibm(0.0), [0; 8]);
/// ```
pub fn ieee_to_ibm(value: f64) -> [u8; 8] {
    if !value.is_finite() {
        return encode_missing(MissingValue::Standard);
    }
    if value == 0.0 {
        return [0; 8];
    }

    let bits = value.to_bits();
    let sign: u8 = if bits >> 63 == 1 { 0x80 } else { 0 };
    let biased = i32::try_from((bits >> 52) & 0x7ff).unwrap_or(0);
    if biased == 0 {
        // IEEE subnormals are far below the smallest IBM magnitude.
        return [0; 8];
    }
    let mantissa = (bits & ((1u64 << 52) - 1)) | (1u64 << 52);

    // value = mantissa * 2^(binary - 52), split binary = 4q + r.
    let binary = biased - 1023;
    let quotient = binary.div_euclid(4);
    let remainder = binary.rem_euclid(4);
    let exponent = quotient + 1 + EXPONENT_BIAS;

    if exponent < 0 {
        return [0; 8];
    }
    if exponent > 0x7f {
        return [sign | 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
    }

    let fraction = mantissa << remainder;
    let fraction_bytes = fraction.to_be_bytes();

    let mut out = [0u8; 8];
    out[0] = sign | u8::try_from(exponent).unwrap_or(0x7f);
    out[1..].copy_from_slice(&fraction_bytes[1..]);
    out
}

/// Returns the missing value code if the bytes encode a SAS missing value.
pub fn is_missing(bytes: &[u8]) -> Option<MissingValue> {
    let (first, rest) = bytes.split_first()?;
    if rest.iter().any(|&b| b != 0) {
        return None;
    }
    MissingValue::from_byte(*first)
}

/// Encodes a SAS missing value.
pub fn encode_missing(missing: MissingValue) -> [u8; 8] {
    let mut out = [0u8; 8];
    out[0] = missing.to_byte();
    out
}

/// Keeps the leading `length` bytes of an IBM float (numeric columns may be
/// stored in 3 to 8 bytes).
pub fn truncate_ibm(bytes: [u8; 8], length: usize) -> Vec<u8> {
    bytes[..length.clamp(1, 8)].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_values() {
        assert_eq!(ieee_to_ibm(1.0), [0x41, 0x10, 0, 0, 0, 0, 0, 0]);
        assert_eq!(ieee_to_ibm(-118.625), [0xC2, 0x76, 0xA0, 0, 0, 0, 0, 0]);
        assert_eq!(ieee_to_ibm(0.5), [0x40, 0x80, 0, 0, 0, 0, 0, 0]);
        assert_eq!(ieee_to_ibm(16.0), [0x42, 0x10, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn smallest_ibm_value_decodes_near_zero() {
        let tiny = ibm_to_ieee([0x00, 0x10, 0, 0, 0, 0, 0, 0]);
        assert!(tiny > 0.0 && tiny < 1e-78);
    }

    #[test]
    fn missing_detection() {
        assert_eq!(is_missing(&[b'.', 0, 0, 0, 0, 0, 0, 0]), Some(MissingValue::Standard));
        assert_eq!(
            is_missing(&[b'_', 0, 0, 0, 0, 0, 0, 0]),
            Some(MissingValue::Underscore)
        );
        assert_eq!(
            is_missing(&[b'Z', 0, 0, 0, 0, 0, 0, 0]),
            Some(MissingValue::Special('Z'))
        );
        assert_eq!(is_missing(&ieee_to_ibm(1.0)), None);
        assert_eq!(is_missing(&[0; 8]), None);
    }

    #[test]
    fn non_finite_encodes_missing() {
        assert_eq!(is_missing(&ieee_to_ibm(f64::NAN)), Some(MissingValue::Standard));
        assert_eq!(is_missing(&ieee_to_ibm(f64::INFINITY)), Some(MissingValue::Standard));
    }

    #[test]
    fn truncation_keeps_prefix() {
        assert_eq!(truncate_ibm(ieee_to_ibm(1.0), 3), vec![0x41, 0x10, 0x00]);
        assert_eq!(truncate_ibm(ieee_to_ibm(1.0), 8).len(), 8);
    }

    proptest! {
        #[test]
        fn integers_survive_conversion(v in -1_000_000i32..1_000_000) {
            let value = f64::from(v);
            prop_assert_eq!(ibm_to_ieee(ieee_to_ibm(value)), value);
        }

        #[test]
        fn fractions_survive_conversion(v in -1e12f64..1e12) {
            let back = ibm_to_ieee(ieee_to_ibm(v));
            prop_assert!((back - v).abs() <= v.abs() * 1e-15);
        }
    }
}
