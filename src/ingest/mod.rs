//! Number ingestion
//!
//! Parses comma-delimited text into one flat, ordered sequence of integers.
//! Rows are read top to bottom and fields left to right.

mod cache;

pub use cache::ParseCache;

use crate::error::{Error, Result};
use tracing::debug;

/// Field delimiter within a row
pub const DELIMITER: char = ',';

/// Trim a field and strip one pair of surrounding double quotes
fn unquote(field: &str) -> &str {
    let field = field.trim();
    field
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .map(str::trim)
        .unwrap_or(field)
}

/// An ordered sequence of parsed integers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NumberSequence {
    values: Vec<i64>,
}

impl NumberSequence {
    /// Wrap already-parsed values
    pub fn new(values: Vec<i64>) -> Self {
        Self { values }
    }

    /// Parse raw input bytes, which must be UTF-8
    pub fn from_bytes(bytes: &[u8], max_values: usize) -> Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Self::parse(text, max_values)
    }

    /// Parse delimited text
    ///
    /// Blank lines contribute nothing. Every other field must be an integer,
    /// optionally surrounded by whitespace and one pair of double quotes.
    pub fn parse(text: &str, max_values: usize) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut values = Vec::new();

        for (line_idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            for field in line.split(DELIMITER) {
                let value = unquote(field).parse::<i64>().map_err(|_| Error::Parse {
                    line: line_idx + 1,
                    field: field.to_string(),
                })?;
                if values.len() == max_values {
                    return Err(Error::InputTooLarge {
                        len: values.len() + 1,
                        max: max_values,
                    });
                }
                values.push(value);
            }
        }

        debug!(count = values.len(), "parsed number sequence");
        Ok(Self { values })
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the sequence is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The values in input order
    pub fn values(&self) -> &[i64] {
        &self.values
    }
}
