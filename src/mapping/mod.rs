//! Mapping system for transforming grid values into color and pitch
//!
//! Colors come from a fixed table; frequencies are derived from each grid's
//! own distinct values.

pub mod color;
pub mod frequency;

pub use color::{encode_png, render_image, value_to_rgb, Rgb, COLOR_TABLE, FALLBACK};
pub use frequency::{FrequencyMap, InverseFrequencyMap};
