//! Error types for the encoding pipeline

use thiserror::Error;

/// Errors that abort a pipeline run
#[derive(Debug, Error)]
pub enum Error {
    /// A field in the input is not a valid integer
    #[error("line {line}: '{field}' is not a valid integer")]
    Parse { line: usize, field: String },

    /// A value falls outside the 8-bit channel range
    #[error("value {value} at position {index} is outside the range 0-255")]
    Range { index: usize, value: i64 },

    /// Fewer than two distinct values, so no frequency spacing exists
    #[error("frequency mapping needs at least 2 distinct values, found {distinct}")]
    DegenerateMapping { distinct: usize },

    /// A grid value has no frequency in the supplied mapping
    #[error("value {value} has no assigned frequency")]
    UnmappedValue { value: u8 },

    /// No integers were parsed
    #[error("input contains no values")]
    EmptyInput,

    /// Sequence length is not a perfect square and the grid policy rejects it
    #[error("{len} values do not form a square grid")]
    NonSquare { len: usize },

    /// Input exceeds the configured value budget
    #[error("input has {len} values, limit is {max}")]
    InputTooLarge { len: usize, max: usize },

    /// Rendered audio would not fit in a WAV data chunk
    #[error("audio needs {samples} samples, a WAV file holds at most {max}")]
    AudioTooLarge { samples: u64, max: u64 },

    /// Sequence is too short to fill the grid being decoded
    #[error("sequence of {len} values cannot fill a {rows}x{cols} grid")]
    ShapeMismatch { len: usize, rows: usize, cols: usize },

    /// Input bytes are not UTF-8 text
    #[error("input is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// Waveform container failure
    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    /// Raster encoding failure
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Metadata (de)serialization failure
    #[error("metadata error: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;
