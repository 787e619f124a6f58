//! Parameters of the ASCII backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::status::{Dictionary, names};
use crate::{OutputError, OutputResult};

/// Largest accepted `precision`.  Fixed-point output beyond this many
/// decimals only pads rows with noise digits.
pub const MAX_PRECISION: u32 = 64;

/// Formatting parameters applied to files at enrollment time.
///
/// Changing them does not touch files that are already open; the new values
/// apply from the next enrollment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsciiParams {
    /// Decimal digits for floating-point columns (fixed-point notation),
    /// at most [`MAX_PRECISION`].
    pub precision: u32,

    /// Extension appended to every file name, without the dot.
    pub file_extension: String,
}

impl Default for AsciiParams {
    fn default() -> Self {
        Self {
            precision:      3,
            file_extension: "dat".to_owned(),
        }
    }
}

impl AsciiParams {
    /// Write the current values into `d`.
    pub fn get(&self, d: &mut Dictionary) {
        d.insert(names::PRECISION.to_owned(), Value::from(self.precision));
        d.insert(names::FILE_EXTENSION.to_owned(), Value::from(self.file_extension.clone()));
    }

    /// Apply the keys of `d` that this backend knows; others are ignored.
    ///
    /// On error `self` may be partially updated.  Callers that need
    /// all-or-nothing semantics update a copy and commit it on success.
    pub fn set(&mut self, d: &Dictionary) -> OutputResult<()> {
        if let Some(v) = d.get(names::PRECISION) {
            self.precision = parse_precision(v)?;
        }
        if let Some(v) = d.get(names::FILE_EXTENSION) {
            self.file_extension = parse_extension(v)?;
        }
        Ok(())
    }
}

fn parse_precision(v: &Value) -> OutputResult<u32> {
    let bad = |reason: &str| OutputError::BadProperty {
        key:    names::PRECISION.to_owned(),
        reason: format!("{reason}, got {v}"),
    };
    if let Some(n) = v.as_u64() {
        return u32::try_from(n)
            .ok()
            .filter(|&p| p <= MAX_PRECISION)
            .ok_or_else(|| bad(&format!("must be at most {MAX_PRECISION}")));
    }
    if v.as_i64().is_some() {
        return Err(bad("must be non-negative"));
    }
    Err(bad("expected an integer"))
}

fn parse_extension(v: &Value) -> OutputResult<String> {
    match v.as_str() {
        Some("") => Err(OutputError::BadProperty {
            key:    names::FILE_EXTENSION.to_owned(),
            reason: "must not be empty".to_owned(),
        }),
        Some(s) => Ok(s.to_owned()),
        None => Err(OutputError::BadProperty {
            key:    names::FILE_EXTENSION.to_owned(),
            reason: format!("expected a string, got {v}"),
        }),
    }
}
