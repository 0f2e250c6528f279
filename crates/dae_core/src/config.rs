//! Conversion options.
//!
//! Options are plain data with serde support so they can be embedded in a
//! host application's settings or loaded from a standalone JSON file:
//!
//! ```json
//! { "float_precision": 4, "numeric_policy": "lenient" }
//! ```
//!
//! Missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::numeric::NumericOptions;

/// Largest supported rounding precision (decimal digits). Beyond this the
/// rounding no longer changes an `f32`.
pub const MAX_FLOAT_PRECISION: u32 = 9;

/// Errors that can occur while loading or validating options.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid options JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("float_precision {0} is out of range (0..=9)")]
    Precision(u32),
}

/// Result type for option loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// What to do with a numeric token that does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericPolicy {
    /// Fail the conversion.
    #[default]
    Strict,
    /// Substitute zero and log a warning.
    Lenient,
}

/// What to do when submeshes of one geometry declare different input layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPolicy {
    /// Fail the conversion with `LayoutMismatch`.
    #[default]
    Strict,
    /// Log a warning and gather each submesh with its own offsets.
    Lenient,
}

/// Options for a single conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    /// Decimal digits kept when parsing floats. Authoring tools export values
    /// like `0.99999994`; rounding makes them weld with their neighbours.
    pub float_precision: u32,

    pub numeric_policy: NumericPolicy,

    pub layout_policy: LayoutPolicy,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            float_precision: 5,
            numeric_policy: NumericPolicy::Strict,
            layout_policy: LayoutPolicy::Strict,
        }
    }
}

impl ReaderOptions {
    /// Parse options from a JSON string and validate them.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a JSON file and validate them.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.float_precision > MAX_FLOAT_PRECISION {
            return Err(ConfigError::Precision(self.float_precision));
        }
        Ok(())
    }

    /// Settings handed to the numeric parser.
    pub fn numeric(&self) -> NumericOptions {
        NumericOptions {
            precision: self.float_precision,
            policy: self.numeric_policy,
        }
    }
}
