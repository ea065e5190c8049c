//! Reconstruction export
//!
//! Serializes the grid back to CSV and writes the metadata needed to invert
//! the frequency mapping. Metadata is a tagged JSON document so any language
//! can read it.

use crate::error::Result;
use crate::grid::Grid;
use crate::mapping::InverseFrequencyMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the synthesized audio
pub const AUDIO_FILE: &str = "output_sound.wav";
/// File name of the reconstruction metadata
pub const METADATA_FILE: &str = "reconstruction.pkl";
/// File name of the decoded grid
pub const DECODED_CSV_FILE: &str = "decoded_data.csv";
/// File name of the rendered image
pub const IMAGE_FILE: &str = "rgb_image.png";

/// Format tag stored in every metadata document
pub const METADATA_FORMAT: &str = "chromatone-reconstruction";
/// Current metadata layout version
pub const METADATA_VERSION: u32 = 1;

/// Serialize the grid as comma-delimited rows
pub fn grid_to_csv(grid: &Grid) -> Vec<u8> {
    let mut out = String::with_capacity(grid.len() * 4);
    for row in grid.rows_iter() {
        out.push_str(&row.iter().map(u8::to_string).collect::<Vec<_>>().join(","));
        out.push('\n');
    }
    out.into_bytes()
}

/// One inverse mapping entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    /// Rounded frequency in Hz
    pub frequency: f64,
    /// Grid value it decodes to
    pub value: u8,
}

/// Everything needed to turn the tone sequence back into a grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructionMetadata {
    pub format: String,
    pub version: u32,
    /// (rows, cols)
    pub shape: (usize, usize),
    pub duration_ms: u32,
    pub sample_rate: u32,
    pub min_hz: f64,
    pub max_hz: f64,
    /// Decimal places the frequencies were rounded to
    pub precision: u32,
    /// Ascending by frequency
    pub freq_to_value: Vec<FrequencyEntry>,
}

impl ReconstructionMetadata {
    /// Capture the metadata of one run
    pub fn new(
        shape: (usize, usize),
        inverse: &InverseFrequencyMap,
        duration_ms: u32,
        sample_rate: u32,
        band: (f64, f64),
    ) -> Self {
        let freq_to_value = inverse
            .entries()
            .into_iter()
            .map(|(frequency, value)| FrequencyEntry { frequency, value })
            .collect();

        Self {
            format: METADATA_FORMAT.to_string(),
            version: METADATA_VERSION,
            shape,
            duration_ms,
            sample_rate,
            min_hz: band.0,
            max_hz: band.1,
            precision: inverse.precision(),
            freq_to_value,
        }
    }

    /// Serialize as pretty-printed JSON
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Read metadata written by [`to_bytes`](Self::to_bytes)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Rebuild the inverse frequency map
    pub fn inverse_map(&self) -> InverseFrequencyMap {
        let mut inverse = InverseFrequencyMap::new(self.precision);
        for entry in &self.freq_to_value {
            inverse.insert(entry.frequency, entry.value);
        }
        inverse
    }
}

/// All artifacts of one run, ready to be written out
#[derive(Debug, Clone)]
pub struct ExportBundle {
    pub image_png: Vec<u8>,
    pub audio_wav: Vec<u8>,
    pub metadata: Vec<u8>,
    pub decoded_csv: Vec<u8>,
}

impl ExportBundle {
    /// Write every artifact into `dir`, creating it if needed
    pub fn write_to_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let files = [
            (IMAGE_FILE, &self.image_png),
            (AUDIO_FILE, &self.audio_wav),
            (METADATA_FILE, &self.metadata),
            (DECODED_CSV_FILE, &self.decoded_csv),
        ];

        let mut written = Vec::with_capacity(files.len());
        for (name, bytes) in files {
            let path = dir.join(name);
            std::fs::write(&path, bytes)?;
            info!(path = %path.display(), bytes = bytes.len(), "wrote artifact");
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridPolicy;
    use crate::ingest::NumberSequence;
    use crate::mapping::FrequencyMap;

    fn grid(values: &[i64]) -> Grid {
        Grid::from_sequence(&NumberSequence::new(values.to_vec()), GridPolicy::Truncate).unwrap()
    }

    #[test]
    fn test_grid_to_csv() {
        let csv = grid_to_csv(&grid(&[1, 2, 3, 4]));
        assert_eq!(String::from_utf8(csv).unwrap(), "1,2\n3,4\n");
    }

    #[test]
    fn test_grid_to_csv_multi_digit_rows() {
        let csv = grid_to_csv(&grid(&[255, 0, 7, 100, 10, 1, 99, 98, 5]));
        assert_eq!(
            String::from_utf8(csv).unwrap(),
            "255,0,7\n100,10,1\n99,98,5\n"
        );
    }

    #[test]
    fn test_csv_parses_back_to_same_grid() {
        let g = grid(&[10, 0, 255, 7, 8, 9, 100, 1, 2]);
        let csv = grid_to_csv(&g);
        let seq = NumberSequence::from_bytes(&csv, 100).unwrap();
        assert_eq!(Grid::from_sequence(&seq, GridPolicy::Reject).unwrap(), g);
    }

    #[test]
    fn test_metadata_contents() {
        let g = grid(&[1, 2, 3, 4]);
        let inverse = FrequencyMap::build(&g, 200.0, 2000.0).unwrap().inverse(5);
        let meta = ReconstructionMetadata::new(g.shape(), &inverse, 10, 44100, (200.0, 2000.0));

        assert_eq!(meta.format, METADATA_FORMAT);
        assert_eq!(meta.shape, (2, 2));
        assert_eq!(meta.duration_ms, 10);
        assert_eq!(
            meta.freq_to_value,
            vec![
                FrequencyEntry { frequency: 200.0, value: 1 },
                FrequencyEntry { frequency: 800.0, value: 2 },
                FrequencyEntry { frequency: 1400.0, value: 3 },
                FrequencyEntry { frequency: 2000.0, value: 4 },
            ]
        );
    }

    #[test]
    fn test_metadata_is_self_describing_json() {
        let g = grid(&[1, 2, 3, 4]);
        let inverse = FrequencyMap::build(&g, 200.0, 2000.0).unwrap().inverse(5);
        let meta = ReconstructionMetadata::new(g.shape(), &inverse, 10, 44100, (200.0, 2000.0));

        let value: serde_json::Value = serde_json::from_slice(&meta.to_bytes().unwrap()).unwrap();
        assert_eq!(value["format"], METADATA_FORMAT);
        assert_eq!(value["shape"], serde_json::json!([2, 2]));
        assert_eq!(value["duration_ms"], 10);
        assert_eq!(value["freq_to_value"][1]["frequency"], 800.0);
        assert_eq!(value["freq_to_value"][1]["value"], 2);
    }

    #[test]
    fn test_metadata_inverse_survives_serialization() {
        let g = grid(&[3, 17, 42, 99, 100, 128, 200, 255, 0]);
        let forward = FrequencyMap::build(&g, 200.0, 2000.0).unwrap();
        let inverse = forward.inverse(5);
        let meta = ReconstructionMetadata::new(g.shape(), &inverse, 10, 44100, (200.0, 2000.0));

        let restored = ReconstructionMetadata::from_bytes(&meta.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, meta);

        let rebuilt = restored.inverse_map();
        for (value, freq) in forward.iter() {
            assert_eq!(rebuilt.lookup(freq), Some(value));
        }
    }

    #[test]
    fn test_write_bundle_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("run");
        let bundle = ExportBundle {
            image_png: vec![1],
            audio_wav: vec![2, 2],
            metadata: b"{}".to_vec(),
            decoded_csv: b"1,2\n3,4\n".to_vec(),
        };

        let written = bundle.write_to_dir(&out).unwrap();
        assert_eq!(written.len(), 4);
        assert_eq!(std::fs::read(out.join(AUDIO_FILE)).unwrap(), vec![2, 2]);
        assert_eq!(std::fs::read(out.join(METADATA_FILE)).unwrap(), b"{}");
        assert_eq!(std::fs::read(out.join(DECODED_CSV_FILE)).unwrap(), b"1,2\n3,4\n");
        assert!(out.join(IMAGE_FILE).exists());
    }
}
