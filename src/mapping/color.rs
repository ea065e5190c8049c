//! Value to color mapping
//!
//! A fixed lookup table assigns RGB triples to a small set of known values.
//! Everything else renders black.

use crate::error::Result;
use crate::grid::Grid;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;

/// An 8-bit RGB triple
pub type Rgb = [u8; 3];

/// Color for values missing from the table
pub const FALLBACK: Rgb = [0, 0, 0];

/// Known values and their colors, sorted by value
///
/// 1-10 walk the hue wheel from red to cyan; 87-100 are named pastel and
/// accent colors.
pub const COLOR_TABLE: [(i64, Rgb); 24] = [
    (1, [255, 0, 0]),
    (2, [255, 85, 0]),
    (3, [255, 170, 0]),
    (4, [255, 255, 0]),
    (5, [170, 255, 0]),
    (6, [85, 255, 0]),
    (7, [0, 255, 0]),
    (8, [0, 255, 85]),
    (9, [0, 255, 170]),
    (10, [0, 255, 255]),
    (87, [255, 255, 240]),
    (88, [240, 255, 255]),
    (89, [224, 255, 255]),
    (90, [224, 238, 238]),
    (91, [255, 240, 245]),
    (92, [238, 230, 230]),
    (93, [205, 201, 201]),
    (94, [139, 134, 134]),
    (95, [255, 248, 220]),
    (96, [255, 69, 0]),
    (97, [255, 215, 0]),
    (98, [138, 43, 226]),
    (99, [240, 128, 128]),
    (100, [250, 235, 215]),
];

/// Look up the color for a value
pub fn value_to_rgb(value: i64) -> Rgb {
    COLOR_TABLE
        .binary_search_by_key(&value, |&(v, _)| v)
        .map(|idx| COLOR_TABLE[idx].1)
        .unwrap_or(FALLBACK)
}

/// Render one pixel per grid cell
pub fn render_image(grid: &Grid) -> RgbImage {
    let side = grid.rows() as u32;
    RgbImage::from_fn(side, side, |x, y| {
        let value = grid.get(y as usize, x as usize).unwrap_or_default();
        image::Rgb(value_to_rgb(value as i64))
    })
}

/// Encode the rendered grid as PNG
pub fn encode_png(grid: &Grid) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    render_image(grid).write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}
