//! Square grid construction
//!
//! Reshapes a flat sequence into an `n x n` row-major grid of 8-bit values,
//! where `n = floor(sqrt(len))`.

use crate::error::{Error, Result};
use crate::ingest::NumberSequence;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, warn};

/// What to do when the sequence length is not a perfect square
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GridPolicy {
    /// Keep the first `n*n` values and drop the rest (default)
    #[default]
    Truncate,
    /// Fail with `Error::NonSquare`
    Reject,
}

/// A square grid of values, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    side: usize,
    cells: Vec<u8>,
}

/// Side length of the largest square that fits in `len` values
pub fn side_for(len: usize) -> usize {
    let mut side = (len as f64).sqrt() as usize;
    // Correct float rounding at perfect-square boundaries
    while side * side > len {
        side -= 1;
    }
    while (side + 1) * (side + 1) <= len {
        side += 1;
    }
    side
}

/// Narrow values to 8 bits, failing on the first one out of range
fn to_cells(values: &[i64]) -> Result<Vec<u8>> {
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| u8::try_from(value).map_err(|_| Error::Range { index, value }))
        .collect()
}

impl Grid {
    /// Build a grid from a parsed sequence
    pub fn from_sequence(seq: &NumberSequence, policy: GridPolicy) -> Result<Self> {
        let values = seq.values();
        if values.is_empty() {
            return Err(Error::EmptyInput);
        }

        let side = side_for(values.len());
        let used = side * side;
        let dropped = values.len() - used;
        if dropped > 0 {
            match policy {
                GridPolicy::Reject => return Err(Error::NonSquare { len: values.len() }),
                GridPolicy::Truncate => {
                    warn!(dropped, kept = used, "sequence is not square, dropping trailing values")
                }
            }
        }

        let cells = to_cells(&values[..used])?;

        debug!(side, "built grid");
        Ok(Self { side, cells })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.side
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.side
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.side, self.side)
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row < self.side && col < self.side {
            Some(self.cells[row * self.side + col])
        } else {
            None
        }
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Iterate over rows
    pub fn rows_iter(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.side)
    }

    /// Distinct values, ascending
    pub fn distinct_values(&self) -> Vec<u8> {
        self.cells.iter().copied().collect::<BTreeSet<u8>>().into_iter().collect()
    }

    /// Simulated decode: reshape the original sequence into this grid's shape
    ///
    /// No signal analysis happens here. The first `rows * cols` values of
    /// `original` fill the result row by row; any further values are dropped.
    pub fn decode(&self, original: &NumberSequence) -> Result<Grid> {
        let (rows, cols) = self.shape();
        let needed = rows * cols;
        let values = original.values();
        if values.len() < needed {
            return Err(Error::ShapeMismatch {
                len: values.len(),
                rows,
                cols,
            });
        }

        let cells = to_cells(&values[..needed])?;

        Ok(Grid { side: self.side, cells })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.cells.iter().map(|v| v.to_string().len()).max().unwrap_or(1);
        for (i, row) in self.rows_iter().enumerate() {
            let cells: Vec<String> = row.iter().map(|v| format!("{:>width$}", v)).collect();
            let open = if i == 0 { "[[" } else { " [" };
            let close = if i + 1 == self.side { "]]" } else { "]" };
            write!(f, "{}{}{}", open, cells.join(" "), close)?;
            if i + 1 < self.side {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
