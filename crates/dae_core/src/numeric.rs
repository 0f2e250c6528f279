//! Numeric token parsing for COLLADA text arrays.
//!
//! COLLADA stores every array (`<float_array>`, `<p>`, `<vcount>`) as a blob of
//! whitespace-separated tokens. Exporters wrap those blobs across lines freely,
//! so newlines count as separators just like spaces.
//!
//! Floats are rounded to a fixed number of decimal digits on the way in.
//! Welding compares vertices bit-for-bit, so this rounding decides which
//! corners end up sharing a vertex.

use thiserror::Error;

use crate::config::NumericPolicy;

/// Errors that can occur while parsing numeric tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumericError {
    #[error("Malformed {kind} token {token:?}")]
    Malformed { token: String, kind: &'static str },
}

/// Result type for numeric parsing.
pub type NumericResult<T> = Result<T, NumericError>;

/// Settings for numeric token parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericOptions {
    /// Decimal digits kept for floats.
    pub precision: u32,
    pub policy: NumericPolicy,
}

impl Default for NumericOptions {
    fn default() -> Self {
        Self {
            precision: 5,
            policy: NumericPolicy::Strict,
        }
    }
}

/// Round `value` to `digits` decimal digits (half away from zero) and narrow
/// to `f32`.
///
/// Negative zero is folded into positive zero so that bitwise comparison agrees
/// with float comparison.
pub fn round_to_precision(value: f64, digits: u32) -> f32 {
    let scale = 10f64.powi(digits as i32);
    let rounded = ((value * scale).round() / scale) as f32;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// A value that can be read from a single array token.
pub trait FromToken: Sized + Copy + Default {
    /// Human-readable type name for error messages.
    const KIND: &'static str;

    /// Parse one token, or `None` when it is malformed.
    fn parse_token(token: &str, precision: u32) -> Option<Self>;

    /// Parse one token, applying the malformed-token policy.
    fn from_token(token: &str, options: &NumericOptions) -> NumericResult<Self> {
        if let Some(value) = Self::parse_token(token, options.precision) {
            return Ok(value);
        }

        match options.policy {
            NumericPolicy::Strict => Err(NumericError::Malformed {
                token: token.to_string(),
                kind: Self::KIND,
            }),
            NumericPolicy::Lenient => {
                log::warn!("Malformed {} token {:?}, substituting zero", Self::KIND, token);
                Ok(Self::default())
            }
        }
    }
}

impl FromToken for f32 {
    const KIND: &'static str = "float";

    fn parse_token(token: &str, precision: u32) -> Option<Self> {
        let value = token.parse::<f64>().ok().filter(|v| v.is_finite())?;
        let rounded = round_to_precision(value, precision);
        // Values beyond f32 range become infinite when narrowed
        rounded.is_finite().then_some(rounded)
    }
}

impl FromToken for u32 {
    const KIND: &'static str = "integer";

    fn parse_token(token: &str, _precision: u32) -> Option<Self> {
        token.parse::<u32>().ok()
    }
}

/// Split a text blob on whitespace and parse every token as `T`.
///
/// Empty or whitespace-only input yields an empty vector.
pub fn read_values<T: FromToken>(text: &str, options: &NumericOptions) -> NumericResult<Vec<T>> {
    text.split_ascii_whitespace()
        .map(|token| T::from_token(token, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lenient() -> NumericOptions {
        NumericOptions {
            policy: NumericPolicy::Lenient,
            ..Default::default()
        }
    }

    #[test]
    fn test_round_to_five_digits() {
        assert_eq!(round_to_precision(0.999999, 5), 1.0);
        assert_eq!(round_to_precision(1.234564, 5), 1.23456);
        assert_eq!(round_to_precision(-2.5, 0), -3.0);
        assert_eq!(round_to_precision(2.5, 0), 3.0);
    }

    #[test]
    fn test_negative_zero_is_canonical() {
        let v = round_to_precision(-0.000001, 5);
        assert_eq!(v.to_bits(), 0.0f32.to_bits());
        let v = f32::parse_token("-0", 5).unwrap();
        assert_eq!(v.to_bits(), 0.0f32.to_bits());
    }

    #[test]
    fn test_noise_collapses_to_same_bits() {
        let a = f32::parse_token("0.49999997", 5).unwrap();
        let b = f32::parse_token("0.5", 5).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_float_rejects_non_finite() {
        assert_eq!(f32::parse_token("nan", 5), None);
        assert_eq!(f32::parse_token("inf", 5), None);
        assert_eq!(f32::parse_token("1e300", 5), None);
        assert_eq!(f32::parse_token("abc", 5), None);
    }

    #[test]
    fn test_int_tokens() {
        assert_eq!(u32::parse_token("42", 5), Some(42));
        assert_eq!(u32::parse_token("-1", 5), None);
        assert_eq!(u32::parse_token("1.5", 5), None);
    }

    #[test]
    fn test_read_values_splits_on_newlines_and_runs_of_spaces() {
        let text = "1 2  3\n4\r\n\t5 \n";
        let values: Vec<u32> = read_values(text, &NumericOptions::default()).unwrap();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_read_values_empty() {
        let values: Vec<f32> = read_values("", &NumericOptions::default()).unwrap();
        assert!(values.is_empty());
        let values: Vec<f32> = read_values("  \n ", &NumericOptions::default()).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_strict_reports_malformed_token() {
        let err = read_values::<f32>("1.0 oops 2.0", &NumericOptions::default()).unwrap_err();
        assert_eq!(
            err,
            NumericError::Malformed {
                token: "oops".to_string(),
                kind: "float"
            }
        );
    }

    #[test]
    fn test_lenient_substitutes_zero() {
        let values: Vec<f32> = read_values("1.0 oops 2.0", &lenient()).unwrap();
        assert_eq!(values, vec![1.0, 0.0, 2.0]);
        let values: Vec<u32> = read_values("3 x 4", &lenient()).unwrap();
        assert_eq!(values, vec![3, 0, 4]);
    }

    #[test]
    fn test_precision_is_configurable() {
        let options = NumericOptions {
            precision: 2,
            ..Default::default()
        };
        let values: Vec<f32> = read_values("1.23456 0.005", &options).unwrap();
        assert_eq!(values, vec![1.23, 0.01]);
    }
}
