//! Encoding engine for Chromatone
//!
//! Chains the pipeline stages for one input: parse, build the grid, color
//! it, map values to frequencies, render tones, then export.

mod recorder;

pub use recorder::{encode_wav, Recorder};

use crate::config::ChromatoneConfig;
use crate::error::Result;
use crate::export::{grid_to_csv, ExportBundle, ReconstructionMetadata};
use crate::grid::Grid;
use crate::ingest::{NumberSequence, ParseCache};
use crate::mapping::{self, FrequencyMap};
use crate::synth::ToneRenderer;
use tracing::info;

/// Everything produced by one run
#[derive(Debug, Clone)]
pub struct Encoded {
    /// The parsed input
    pub sequence: NumberSequence,
    /// Grid built from the input
    pub grid: Grid,
    /// Values dropped to make the grid square
    pub dropped: usize,
    /// Value to frequency mapping used for the audio
    pub frequencies: FrequencyMap,
    /// Grid recovered by the simulated decode
    pub decoded: Grid,
    /// Serialized artifacts
    pub bundle: ExportBundle,
}

/// The pipeline driver
///
/// Holds configuration and the parse cache; every run allocates its own
/// grid, mapping and buffers.
pub struct Engine {
    config: ChromatoneConfig,
    cache: ParseCache,
    renderer: ToneRenderer,
}

impl Engine {
    /// Create a new engine with the given configuration
    pub fn new(config: ChromatoneConfig) -> Self {
        let cache = ParseCache::new(config.limits.cache_capacity);
        let renderer = ToneRenderer::from_config(&config.audio);
        Self {
            config,
            cache,
            renderer,
        }
    }

    pub fn config(&self) -> &ChromatoneConfig {
        &self.config
    }

    pub fn cache(&self) -> &ParseCache {
        &self.cache
    }

    /// Parse input bytes through the cache
    pub fn parse(&mut self, input: &[u8]) -> Result<NumberSequence> {
        self.cache.get_or_parse(input, self.config.limits.max_values)
    }

    /// Build the grid and frequency mapping without rendering anything
    pub fn analyze(&mut self, input: &[u8]) -> Result<(NumberSequence, Grid, FrequencyMap)> {
        let sequence = self.parse(input)?;
        let grid = Grid::from_sequence(&sequence, self.config.grid.policy)?;
        let frequencies =
            FrequencyMap::build(&grid, self.config.frequency.min_hz, self.config.frequency.max_hz)?;
        Ok((sequence, grid, frequencies))
    }

    /// Run the full pipeline on raw input bytes
    pub fn encode(&mut self, input: &[u8]) -> Result<Encoded> {
        let (sequence, grid, frequencies) = self.analyze(input)?;
        let dropped = sequence.len() - grid.len();
        info!(
            values = sequence.len(),
            side = grid.rows(),
            dropped,
            distinct = frequencies.len(),
            "encoding grid"
        );

        let image_png = mapping::encode_png(&grid)?;

        let samples = self.renderer.render(&grid, &frequencies)?;
        let audio_wav = encode_wav(&samples, self.renderer.sample_rate())?;

        let inverse = frequencies.inverse(self.config.frequency.precision);
        let metadata = ReconstructionMetadata::new(
            grid.shape(),
            &inverse,
            self.renderer.tone_duration_ms(),
            self.renderer.sample_rate(),
            (frequencies.min_hz(), frequencies.max_hz()),
        )
        .to_bytes()?;

        let decoded = grid.decode(&sequence)?;
        let decoded_csv = grid_to_csv(&decoded);

        info!(
            samples = samples.len(),
            duration_ms = self.renderer.total_duration_ms(&grid),
            "encoding complete"
        );

        Ok(Encoded {
            sequence,
            grid,
            dropped,
            frequencies,
            decoded,
            bundle: ExportBundle {
                image_png,
                audio_wav,
                metadata,
                decoded_csv,
            },
        })
    }
}
