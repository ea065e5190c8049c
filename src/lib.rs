//! Chromatone - grids of integers as color and sound
//!
//! Turns a delimited file of integers into a square grid, paints it as an
//! RGB image, plays it as a sequence of tones, and exports what is needed to
//! reconstruct it.

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod grid;
pub mod ingest;
pub mod mapping;
pub mod synth;

pub use config::ChromatoneConfig;
pub use engine::{Encoded, Engine};
pub use error::{Error, Result};
pub use grid::{Grid, GridPolicy};
pub use ingest::NumberSequence;
